use bon::Builder;
use tracing::info;

static CONSERVE_MEMORY_ENV: &str = "TARP_CONSERVE_MEMORY";

#[derive(Debug, Copy, Clone, Default, Builder)]
#[cfg_attr(test, derive(Eq, PartialEq))]
/// Options controlling how columns are copied.
pub struct CopyOptions {
    #[builder(default)]
    /// Conserve memory when copying an unloaded column.
    ///
    /// The source column is loaded only for the duration of the copy and
    /// released again afterwards, trading an extra read of the backing
    /// block for not keeping a column in memory nobody asked for.
    conserve_memory: bool,
}

impl CopyOptions {
    #[inline]
    /// Returns `true` if the conserve-memory copy mode is enabled.
    pub fn conserve_memory(&self) -> bool {
        self.conserve_memory
    }

    /// Builds the options from the environment.
    ///
    /// `TARP_CONSERVE_MEMORY` enables the conserve-memory copy mode when set
    /// to `1`, `true` or `yes`.
    pub fn from_env() -> Self {
        let conserve_memory = std::env::var(CONSERVE_MEMORY_ENV)
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        info!(conserve_memory, "Loaded copy options from environment");
        Self::builder().conserve_memory(conserve_memory).build()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
