/// The secret note of one challenger. Only reachable through the auth
/// gateway, and overwritten wholesale on every write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretVault {
    note: String,
}

impl SecretVault {
    pub fn with_note(note: impl Into<String>) -> Self {
        Self { note: note.into() }
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn write(&mut self, note: impl Into<String>) -> &str {
        self.note = note.into();
        &self.note
    }
}
