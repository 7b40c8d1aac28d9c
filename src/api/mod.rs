use crate::models::{DbUser, Note, Tag};
use crate::util::{coerce_numeric_id, coerce_numeric_id_value};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    pub(crate) fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    pub(crate) fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    pub(crate) fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Runtime configuration injected by the hosting page as `window.ENV`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub auth_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let mut cfg = Self {
            api_url: "http://localhost:8080".to_string(),
            auth_url: "http://localhost:54321/auth/v1".to_string(),
        };

        // `window.ENV.API_URL` / `window.ENV.AUTH_URL`, with lowercase
        // variants accepted for compatibility with older deploy scripts.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    if let Some(url) = read_env_string(&env, &["API_URL", "api_url"]) {
                        cfg.api_url = url;
                    }
                    if let Some(url) = read_env_string(&env, &["AUTH_URL", "auth_url"]) {
                        cfg.auth_url = url;
                    }
                }
            }
        }

        cfg
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_env_string(env: &js_sys::Object, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Ok(value) = js_sys::Reflect::get(env, &(*key).into()) {
            if let Some(s) = value.as_string() {
                return Some(s);
            }
        }
    }
    None
}

/// Wire shape of a tag (numeric id server-side).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct TagDto {
    pub id: i64,
    pub label: String,
}

impl TagDto {
    fn into_tag(self) -> Tag {
        Tag {
            id: self.id.to_string(),
            label: self.label,
        }
    }
}

/// Wire shape of a note. `username` and `tags` are absent on some
/// endpoints, so both default.
#[derive(Deserialize, Clone, Debug)]
pub(crate) struct NoteDto {
    pub id: i64,
    pub title: String,
    pub markdown: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub tags: Vec<TagDto>,
}

impl NoteDto {
    /// Split into the store representation (tag-id refs only) plus the tag
    /// objects the response carried, which callers merge into the catalog.
    fn into_note_and_tags(self) -> (Note, Vec<Tag>) {
        let tags: Vec<Tag> = self.tags.into_iter().map(TagDto::into_tag).collect();
        let note = Note {
            id: self.id.to_string(),
            title: self.title,
            markdown: self.markdown,
            username: self.username,
            tag_ids: tags.iter().map(|t| t.id.clone()).collect(),
        };
        (note, tags)
    }
}

/// Tag reference in a mutation payload. A string id that never resolved to
/// a number (an unconfirmed `tmp-*` id) serializes as `null`; the server
/// rejects such an entry.
#[derive(Serialize, Clone, Debug)]
pub(crate) struct TagIdRef {
    pub id: Option<i64>,
}

impl TagIdRef {
    fn from_id(id: &str) -> Self {
        Self {
            id: coerce_numeric_id_value(id),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct TagRef {
    pub id: Option<i64>,
    pub label: String,
}

#[derive(Serialize, Clone, Debug)]
struct CreateNotePayload {
    title: String,
    markdown: String,
    tags: Vec<TagIdRef>,
    user_id: i64,
}

#[derive(Serialize, Clone, Debug)]
struct UpdateNotePayload {
    title: String,
    markdown: String,
    tags: Vec<TagRef>,
}

#[derive(Serialize, Clone, Debug)]
struct TagLabelPayload {
    label: String,
}

pub(crate) fn tag_ids_csv(ids: &[String]) -> String {
    ids.join(",")
}

/// REST gateway for the notes/tags/users service.
#[derive(Clone)]
pub(crate) struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let res = client.get(url).send().await.map_err(ApiError::network)?;
        Self::decode(res).await
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &impl serde::Serialize,
    ) -> ApiResult<T> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let res = client
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(ApiError::network)?;
        Self::decode(res).await
    }

    /// Status-only request for endpoints whose response body we discard.
    async fn send_unit(&self, method: reqwest::Method, path: &str) -> ApiResult<()> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let res = client
            .request(method, url)
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().is_success() {
            Ok(())
        } else {
            Err(Self::status_error(res).await)
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(res: reqwest::Response) -> ApiResult<T> {
        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            Err(Self::status_error(res).await)
        }
    }

    async fn status_error(res: reqwest::Response) -> ApiError {
        if res.status().as_u16() == 401 {
            return ApiError::unauthorized();
        }
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        ApiError::http(status, body, "Request failed")
    }

    /// GET /tags — full tag catalog.
    pub async fn get_tags(&self) -> ApiResult<Vec<Tag>> {
        let dtos: Vec<TagDto> = self.get_json("/tags").await?;
        Ok(dtos.into_iter().map(TagDto::into_tag).collect())
    }

    /// GET /notes/by-tags?tagIds=csv — notes whose tags intersect the ids.
    pub async fn get_notes_by_tags(&self, tag_ids: &[String]) -> ApiResult<Vec<Note>> {
        let path = format!("/notes/by-tags?tagIds={}", tag_ids_csv(tag_ids));
        let dtos: Vec<NoteDto> = self.get_json(&path).await?;
        Ok(dtos
            .into_iter()
            .map(|dto| dto.into_note_and_tags().0)
            .collect())
    }

    /// POST /notes — create, returning the confirmed note plus the tag
    /// objects to merge into the catalog.
    pub async fn create_note(
        &self,
        title: &str,
        markdown: &str,
        tags: &[Tag],
        user_id: i64,
    ) -> ApiResult<(Note, Vec<Tag>)> {
        let payload = CreateNotePayload {
            title: title.to_string(),
            markdown: markdown.to_string(),
            tags: tags.iter().map(|t| TagIdRef::from_id(&t.id)).collect(),
            user_id,
        };
        let dto: NoteDto = self
            .send_json(reqwest::Method::POST, "/notes", &payload)
            .await?;
        Ok(dto.into_note_and_tags())
    }

    /// PUT /notes/{id} — full replace of title/body/tag set.
    pub async fn update_note(
        &self,
        id: &str,
        title: &str,
        markdown: &str,
        tags: &[Tag],
    ) -> ApiResult<(Note, Vec<Tag>)> {
        let payload = UpdateNotePayload {
            title: title.to_string(),
            markdown: markdown.to_string(),
            tags: tags
                .iter()
                .map(|t| TagRef {
                    id: coerce_numeric_id_value(&t.id),
                    label: t.label.clone(),
                })
                .collect(),
        };
        let path = format!("/notes/{}", coerce_numeric_id(id));
        let dto: NoteDto = self.send_json(reqwest::Method::PUT, &path, &payload).await?;
        Ok(dto.into_note_and_tags())
    }

    /// DELETE /notes/{id}.
    pub async fn delete_note(&self, id: &str) -> ApiResult<()> {
        let path = format!("/notes/{}", coerce_numeric_id(id));
        self.send_unit(reqwest::Method::DELETE, &path).await
    }

    /// POST /tags — create from a label, id assigned server-side.
    pub async fn create_tag(&self, label: &str) -> ApiResult<Tag> {
        let payload = TagLabelPayload {
            label: label.to_string(),
        };
        let dto: TagDto = self
            .send_json(reqwest::Method::POST, "/tags", &payload)
            .await?;
        Ok(dto.into_tag())
    }

    /// PUT /tags/{id} — rename.
    pub async fn rename_tag(&self, id: &str, label: &str) -> ApiResult<Tag> {
        let payload = TagLabelPayload {
            label: label.to_string(),
        };
        let path = format!("/tags/{}", coerce_numeric_id(id));
        let dto: TagDto = self.send_json(reqwest::Method::PUT, &path, &payload).await?;
        Ok(dto.into_tag())
    }

    /// DELETE /tags/{id}.
    pub async fn delete_tag(&self, id: &str) -> ApiResult<()> {
        let path = format!("/tags/{}", coerce_numeric_id(id));
        self.send_unit(reqwest::Method::DELETE, &path).await
    }

    /// GET /users/by-supabase/{externalId} — resolve the local user record.
    pub async fn get_user_by_external_id(&self, external_id: &str) -> ApiResult<DbUser> {
        let path = format!("/users/by-supabase/{external_id}");
        self.get_json(&path).await
    }

    /// GET /users/{userId}/tags — the user's interest tags.
    pub async fn get_user_tags(&self, user_id: i64) -> ApiResult<Vec<Tag>> {
        let path = format!("/users/{user_id}/tags");
        let dtos: Vec<TagDto> = self.get_json(&path).await?;
        Ok(dtos.into_iter().map(TagDto::into_tag).collect())
    }

    /// PUT /users/{userId}/tags — replace the interest set.
    pub async fn replace_user_tags(&self, user_id: i64, tag_ids: &[String]) -> ApiResult<()> {
        let payload: Vec<TagIdRef> = tag_ids.iter().map(|id| TagIdRef::from_id(id)).collect();
        let path = format!("/users/{user_id}/tags");
        let _: serde_json::Value = self
            .send_json(reqwest::Method::PUT, &path, &payload)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_list_contract_deserialize() {
        // Contract: GET /notes/by-tags
        let json = r##"[
            {
                "id": 9,
                "title": "Foo",
                "markdown": "# body",
                "user_id": 3,
                "username": "octocat",
                "tags": [{"id": 1, "label": "AI"}]
            }
        ]"##;
        let dtos: Vec<NoteDto> = serde_json::from_str(json).expect("note list should parse");
        let (note, tags) = dtos.into_iter().next().unwrap().into_note_and_tags();
        assert_eq!(note.id, "9");
        assert_eq!(note.username, "octocat");
        assert_eq!(note.tag_ids, vec!["1".to_string()]);
        assert_eq!(tags[0].label, "AI");
    }

    #[test]
    fn note_without_tags_defaults_to_empty() {
        let json = r#"{"id": 4, "title": "t", "markdown": "m"}"#;
        let dto: NoteDto = serde_json::from_str(json).expect("bare note should parse");
        let (note, tags) = dto.into_note_and_tags();
        assert!(note.tag_ids.is_empty());
        assert!(note.username.is_empty());
        assert!(tags.is_empty());
    }

    #[test]
    fn create_note_payload_serialization() {
        let payload = CreateNotePayload {
            title: "Foo".to_string(),
            markdown: "body".to_string(),
            tags: vec![TagIdRef::from_id("1"), TagIdRef::from_id("2")],
            user_id: 7,
        };
        let v = serde_json::to_value(payload).expect("should serialize");
        assert_eq!(v["title"], "Foo");
        assert_eq!(v["user_id"], 7);
        assert_eq!(v["tags"][0]["id"], 1);
        assert_eq!(v["tags"][1]["id"], 2);
    }

    #[test]
    fn unconfirmed_tmp_tag_id_serializes_as_null() {
        // A note submitted before the inline-created tag was confirmed
        // carries `null` for that tag; the server rejects the entry.
        let v = serde_json::to_value(TagIdRef::from_id("tmp-5")).expect("should serialize");
        assert!(v["id"].is_null());
    }

    #[test]
    fn update_note_payload_carries_labels() {
        let payload = UpdateNotePayload {
            title: "t".to_string(),
            markdown: "m".to_string(),
            tags: vec![TagRef {
                id: Some(2),
                label: "Climate".to_string(),
            }],
        };
        let v = serde_json::to_value(payload).expect("should serialize");
        assert_eq!(v["tags"][0]["id"], 2);
        assert_eq!(v["tags"][0]["label"], "Climate");
    }

    #[test]
    fn interest_payload_is_id_ref_list() {
        let ids = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        let payload: Vec<TagIdRef> = ids.iter().map(|id| TagIdRef::from_id(id)).collect();
        let v = serde_json::to_value(payload).expect("should serialize");
        assert_eq!(v, serde_json::json!([{"id":1},{"id":2},{"id":3}]));
    }

    #[test]
    fn tag_ids_join_as_csv() {
        let ids = vec!["1".to_string(), "2".to_string(), "5".to_string()];
        assert_eq!(tag_ids_csv(&ids), "1,2,5");
        assert_eq!(tag_ids_csv(&[]), "");
    }

    #[test]
    fn tag_contract_roundtrip() {
        let json = r#"{"id": 3, "label": "Web"}"#;
        let dto: TagDto = serde_json::from_str(json).expect("tag should parse");
        let tag = dto.into_tag();
        assert_eq!(tag.id, "3");
        assert_eq!(tag.label, "Web");
    }

    #[test]
    fn api_error_display_uses_message() {
        let e = ApiError {
            kind: ApiErrorKind::Http,
            message: "Request failed (500): boom".to_string(),
        };
        assert_eq!(e.to_string(), "Request failed (500): boom");
    }
}
