use serde::{Deserialize, Serialize};

/// What the verifier requires the disclosed attributes to show.
///
/// An unset requirement is not checked; the corresponding check passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirements {
    /// Scope the proof must be bound to.
    pub scope: Option<String>,
    /// Attestation id the proof must carry.
    pub attestation_id: Option<String>,
    /// Whether the proof must carry a current date close to today.
    pub require_current_date: bool,
    pub issuing_state: Option<String>,
    pub name: Option<String>,
    pub passport_number: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub expiry_date: Option<String>,
    /// Minimum age the proof must attest to.
    pub minimum_age: Option<u32>,
    /// Address the attestation must be bound to.
    pub owner_of: Option<String>,
    /// Countries that must all appear in the disclosed forbidden list.
    pub forbidden_countries: Vec<String>,
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            scope: None,
            attestation_id: None,
            require_current_date: true,
            issuing_state: None,
            name: None,
            passport_number: None,
            nationality: None,
            date_of_birth: None,
            gender: None,
            expiry_date: None,
            minimum_age: None,
            owner_of: None,
            forbidden_countries: Vec::new(),
        }
    }
}

impl Requirements {
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_attestation_id(mut self, id: impl Into<String>) -> Self {
        self.attestation_id = Some(id.into());
        self
    }

    pub fn with_nationality(mut self, nationality: impl Into<String>) -> Self {
        self.nationality = Some(nationality.into());
        self
    }

    pub fn with_minimum_age(mut self, age: u32) -> Self {
        self.minimum_age = Some(age);
        self
    }

    pub fn with_forbidden_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.forbidden_countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn without_current_date(mut self) -> Self {
        self.require_current_date = false;
        self
    }
}
