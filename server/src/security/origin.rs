/// Decides whether a request's declared `Origin` is trusted.
///
/// One instance is built from `security.allowed_origins` at startup and
/// shared by CORS and the CSRF guard, so the two can never disagree about
/// which origins are trusted.
///
/// Matching is deliberately strict: case-sensitive, byte-exact, no scheme
/// or port normalization, no trailing-slash stripping.  The only non-exact
/// rule is the `chrome-extension://` prefix, which accepts any suffix —
/// extension IDs are not validated.
#[derive(Clone, Debug)]
pub struct OriginValidator {
    allowed: Vec<String>,
}

const EXTENSION_PREFIX: &str = "chrome-extension://";

impl OriginValidator {
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    /// `true` iff the origin exactly matches an allow-list entry or starts
    /// with `chrome-extension://`.  Absent origins are never trusted.
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        let Some(origin) = origin else {
            return false;
        };

        if self.allowed.iter().any(|entry| entry == origin) {
            return true;
        }

        origin.starts_with(EXTENSION_PREFIX)
    }
}
