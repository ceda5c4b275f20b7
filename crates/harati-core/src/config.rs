/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field names map to upper-cased
/// env vars (`supabase_url` ← `SUPABASE_URL`). Use `#[serde(default = ...)]`
/// for optional settings.
pub trait Config: Sized + ::serde::de::DeserializeOwned {
    fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Load from an explicit iterator of pairs instead of the process env.
    fn from_pairs<I>(pairs: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(pairs)
    }
}
