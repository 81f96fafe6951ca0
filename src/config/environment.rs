//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;

use thiserror::Error;

/// Errores al leer la configuración del entorno
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    pub rate_limit_window: u64,
    /// Sólo detrás de un proxy propio se confía en `x-forwarded-for`
    pub trust_proxy: bool,
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Construir la configuración a partir de una función de búsqueda.
    /// `from_env` la usa con `std::env`; los tests con un mapa.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: parse_or(&lookup, "PORT", 3001)?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            jwt_secret,
            cors_origins: lookup("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            rate_limit_requests: parse_or(&lookup, "RATE_LIMIT_REQUESTS", 120)?,
            rate_limit_window: parse_or(&lookup, "RATE_LIMIT_WINDOW", 60)?,
            trust_proxy: parse_or(&lookup, "TRUST_PROXY", false)?,
        })
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_with_only_secret() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.rate_limit_requests, 120);
        assert_eq!(config.rate_limit_window, 60);
        assert_eq!(config.server_url(), "0.0.0.0:3001");
        assert!(!config.trust_proxy);
    }

    #[test]
    fn test_trust_proxy_flag() {
        let config =
            EnvironmentConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret"), ("TRUST_PROXY", "true")])).unwrap();
        assert!(config.trust_proxy);

        let result = EnvironmentConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret"), ("TRUST_PROXY", "yes")]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "TRUST_PROXY", .. })));
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let result = EnvironmentConfig::from_lookup(lookup_from(&[("PORT", "8080")]));
        assert!(matches!(result, Err(ConfigError::Missing("JWT_SECRET"))));
    }

    #[test]
    fn test_invalid_port_is_reported() {
        let result = EnvironmentConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "not-a-port"),
        ]));
        match result {
            Err(ConfigError::Invalid { name, value }) => {
                assert_eq!(name, "PORT");
                assert_eq!(value, "not-a-port");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_cors_origins_are_split_and_trimmed() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("CORS_ORIGINS", "http://localhost:3000, https://admin.example.com ,"),
            ("ENVIRONMENT", "production"),
        ]))
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000".to_string(), "https://admin.example.com".to_string()]
        );
        assert!(config.is_production());
    }
}
