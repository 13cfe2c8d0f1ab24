//! Shape of the `/api/db_config/{region}/{db_id}/{db_name}` response

use serde::{Deserialize, Serialize};

/// Connection parameters for one database, including the ephemeral IAM
/// auth-token password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Bastion host to tunnel through.
    pub bh_hostname: String,
    pub bh_username: String,
    /// RDS endpoint.
    pub rds_hostname: String,
    pub rds_port: u16,
    pub rds_username: String,
    /// Presigned-URL auth token; carries its own expiry window as
    /// `X-Amz-*` query parameters.
    pub rds_password: String,
    pub db_name: String,
}

impl DbConfig {
    /// Field name/value rows in display order, matching the form layout of
    /// the portal configuration page.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("bh_hostname", self.bh_hostname.clone()),
            ("bh_username", self.bh_username.clone()),
            ("rds_hostname", self.rds_hostname.clone()),
            ("rds_port", self.rds_port.to_string()),
            ("rds_username", self.rds_username.clone()),
            ("rds_password", self.rds_password.clone()),
            ("db_name", self.db_name.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_db_config() {
        let json = r#"{
            "bh_hostname": "bastion.example.com",
            "bh_username": "tunnel",
            "rds_hostname": "orders-db.abc.eu-west-1.rds.amazonaws.com",
            "rds_port": 5432,
            "rds_username": "alice",
            "rds_password": "orders-db.abc:5432/?X-Amz-Expires=900",
            "db_name": "orders"
        }"#;

        let config: DbConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rds_port, 5432);
        assert_eq!(config.rows().len(), 7);
    }
}
