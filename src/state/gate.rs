use crate::models::LocalUser;

/// Minimum interest-set cardinality before onboarding completes; also the
/// client-side floor for saving an interest selection.
pub(crate) const MIN_INTERESTS: usize = 3;

/// Which screen tier the app is allowed to render. Only `Active` renders
/// protected screens; any loss of identity falls back to `Anonymous`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)] // strum `derive` feature enabled in Cargo.toml
pub(crate) enum AccessGate {
    Loading,
    Anonymous,
    Onboarding,
    Active,
}

/// Client-side floor for saving an interest selection; below it no save
/// request is issued at all.
pub(crate) fn interests_satisfy_minimum(count: usize) -> bool {
    count >= MIN_INTERESTS
}

pub(crate) fn access_gate(
    session_checked: bool,
    has_identity: bool,
    local_user: &LocalUser,
    interest_count: usize,
) -> AccessGate {
    if !session_checked {
        return AccessGate::Loading;
    }
    if !has_identity {
        return AccessGate::Anonymous;
    }
    if !local_user.is_resolved() || !interests_satisfy_minimum(interest_count) {
        return AccessGate::Onboarding;
    }
    AccessGate::Active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DbUser;

    fn resolved() -> LocalUser {
        LocalUser::Resolved(DbUser {
            id: 1,
            email: String::new(),
        })
    }

    #[test]
    fn starts_loading_until_session_checked() {
        assert_eq!(
            access_gate(false, false, &LocalUser::Unresolved, 0),
            AccessGate::Loading
        );
        // Session check outcome is irrelevant while it is in flight.
        assert_eq!(access_gate(false, true, &resolved(), 5), AccessGate::Loading);
    }

    #[test]
    fn no_identity_means_anonymous() {
        assert_eq!(
            access_gate(true, false, &LocalUser::Unresolved, 0),
            AccessGate::Anonymous
        );
        // Loss of identity overrides everything downstream.
        assert_eq!(access_gate(true, false, &resolved(), 5), AccessGate::Anonymous);
    }

    #[test]
    fn unresolved_local_user_stays_onboarding() {
        assert_eq!(
            access_gate(true, true, &LocalUser::Unresolved, 5),
            AccessGate::Onboarding
        );
    }

    #[test]
    fn interest_floor_gates_activation() {
        assert_eq!(access_gate(true, true, &resolved(), 2), AccessGate::Onboarding);
        assert_eq!(access_gate(true, true, &resolved(), 3), AccessGate::Active);
        assert_eq!(access_gate(true, true, &resolved(), 4), AccessGate::Active);
    }

    #[test]
    fn save_floor_matches_gate_floor() {
        assert!(!interests_satisfy_minimum(0));
        assert!(!interests_satisfy_minimum(2));
        assert!(interests_satisfy_minimum(3));
    }

    #[test]
    fn gate_names_render_for_diagnostics() {
        assert_eq!(AccessGate::Onboarding.to_string(), "Onboarding");
    }
}
