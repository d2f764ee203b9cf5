//! # Environment & Secrets Module / 环境与机密模块
//!
//! Validates the environment an execution asks for, resolves secret-marked
//! variables into plain values, and redacts those values from captured output.
//!
//! 校验执行请求的环境变量，将标记为机密的变量解析为明文，并从捕获的输出中脱敏。

use anyhow::{bail, Result};
use std::collections::BTreeMap;

use crate::core::error::RunnerError;
use crate::core::models::Variable;

/// Replacement text for redacted secrets.
pub const MASK: &str = "*****";

/// Checks every name and value and returns the environment for the test process.
///
/// The environment is handed to the child process rather than exported into
/// this process, so concurrent executions never see each other's variables.
///
/// 检查每个名称和值，并返回测试进程的环境。
pub fn prepare_env(envs: &BTreeMap<String, String>) -> Result<BTreeMap<String, String>, RunnerError> {
    for (name, value) in envs {
        let reason = if name.is_empty() {
            Some("name is empty")
        } else if name.contains('=') {
            Some("name contains '='")
        } else if name.contains('\0') || value.contains('\0') {
            Some("contains a NUL byte")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(RunnerError::Environment {
                name: name.clone(),
                reason,
            });
        }
    }
    Ok(envs.clone())
}

/// Resolves secret variables and redacts their values from output.
/// 解析机密变量并从输出中脱敏其值。
pub trait SecretManager {
    /// Returns every variable as a plain name/value pair.
    fn materialize(&mut self, variables: &BTreeMap<String, Variable>) -> Result<BTreeMap<String, String>>;

    /// Replaces every materialized secret value in `output`.
    fn obfuscate(&self, output: &str) -> String;
}

/// Secrets arrive decoded in the variable value; an empty secret value is
/// looked up in the process environment under the variable's name.
///
/// 机密以解码后的形式出现在变量值中；空的机密值会按变量名在进程环境中查找。
#[derive(Debug, Default)]
pub struct EnvSecretManager {
    secrets: Vec<String>,
}

impl EnvSecretManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretManager for EnvSecretManager {
    fn materialize(&mut self, variables: &BTreeMap<String, Variable>) -> Result<BTreeMap<String, String>> {
        let mut plain = BTreeMap::new();
        for (name, variable) in variables {
            let value = if variable.is_secret() && variable.value.is_empty() {
                match std::env::var(name) {
                    Ok(value) => value,
                    Err(_) => bail!("secret variable '{}' has no value", name),
                }
            } else {
                variable.value.clone()
            };
            if variable.is_secret() && !value.is_empty() {
                self.secrets.push(value.clone());
            }
            plain.insert(name.clone(), value);
        }
        // longest first so a secret containing another is masked whole
        self.secrets.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        self.secrets.dedup();
        Ok(plain)
    }

    fn obfuscate(&self, output: &str) -> String {
        self.secrets
            .iter()
            .fold(output.to_string(), |out, secret| out.replace(secret.as_str(), MASK))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_env_rejects_bad_names() {
        let bad = BTreeMap::from([("A=B".to_string(), "x".to_string())]);
        assert!(matches!(
            prepare_env(&bad),
            Err(RunnerError::Environment { .. })
        ));

        let empty = BTreeMap::from([(String::new(), "x".to_string())]);
        assert!(prepare_env(&empty).is_err());

        let good = BTreeMap::from([("GOFLAGS".to_string(), "-count=1".to_string())]);
        assert_eq!(prepare_env(&good).unwrap(), good);
    }

    #[test]
    fn test_materialize_and_obfuscate() {
        let vars = BTreeMap::from([
            ("Token".to_string(), Variable::secret("Token", "abc123")),
            ("Plain".to_string(), Variable::basic("Plain", "visible")),
        ]);
        let mut manager = EnvSecretManager::new();

        let plain = manager.materialize(&vars).unwrap();

        assert_eq!(plain["Token"], "abc123");
        assert_eq!(plain["Plain"], "visible");
        assert_eq!(
            manager.obfuscate("token=abc123 plain=visible"),
            "token=***** plain=visible"
        );
    }

    #[test]
    fn test_missing_secret_value_fails() {
        let vars = BTreeMap::from([(
            "GINKGO_RUNNER_TEST_UNSET_SECRET_7731".to_string(),
            Variable::secret("GINKGO_RUNNER_TEST_UNSET_SECRET_7731", ""),
        )]);
        assert!(EnvSecretManager::new().materialize(&vars).is_err());
    }
}
