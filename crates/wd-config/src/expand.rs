//! `${VAR}` expansion in string settings.
//!
//! `${VAR:-default}` falls back to `default` when `VAR` is unset. Bare
//! `$VAR` is left alone so renderer paths containing `$` survive.

use std::borrow::Cow;
use std::env::VarError;

use crate::ConfigError;

/// Expand `${VAR}` references in the value of `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| std::env::var(name).map(Some))
        .map(Cow::into_owned)
        .map_err(|err| {
            let reason = match err.cause {
                VarError::NotPresent => "not set",
                VarError::NotUnicode(_) => "not valid UTF-8",
            };
            ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("${{{}}} {reason}", err.var_name),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_content_path_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("WD_TEST_SITE_ROOT", "/srv/site");
        }
        let result = expand_env("${WD_TEST_SITE_ROOT}/content", "content.path").unwrap();
        assert_eq!(result, "/srv/site/content");
        unsafe {
            std::env::remove_var("WD_TEST_SITE_ROOT");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("WD_TEST_UNSET_CLI");
        }
        let result = expand_env("${WD_TEST_UNSET_CLI:-wavedrom-cli}", "wavedrom.cli").unwrap();
        assert_eq!(result, "wavedrom-cli");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("WD_TEST_MISSING");
        }
        let err = expand_env("${WD_TEST_MISSING}", "wavedrom.cli").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("${WD_TEST_MISSING} not set"));
        assert!(err.to_string().contains("wavedrom.cli"));
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("/opt/$bin/wavedrom-cli", "wavedrom.cli").unwrap();
        assert_eq!(result, "/opt/$bin/wavedrom-cli");
    }
}
