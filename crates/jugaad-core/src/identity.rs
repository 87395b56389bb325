use serde::{Deserialize, Serialize};

/// The signed-in user as exposed by the identity provider.
///
/// Treated as an opaque gating prerequisite for identity-dependent fetches;
/// the fields are forwarded to the backend verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub display_name: String,
}
