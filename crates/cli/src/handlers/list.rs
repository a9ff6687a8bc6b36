//! `probe list`.

use probe_application::catalog;
use probe_domain::ProbeConfig;

use crate::presentation::render_catalog;

/// Prints every built-in group with its cases.
pub fn execute(config: &ProbeConfig) {
    print!("{}", render_catalog(&catalog::builtin(config)));
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_listing_names_every_group() {
        let text = render_catalog(&catalog::builtin(&ProbeConfig::default()));
        assert!(text.starts_with("Available check groups:\n1. "));
        for number in 1..=5 {
            assert!(text.contains(&format!("\n{number}. ")), "group {number} missing");
        }
        assert!(text.contains("   5.6   "));
    }
}
