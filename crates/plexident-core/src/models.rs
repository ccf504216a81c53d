// Domain records shared by the session manager, the HTTP client, and the CLI.
//
// Field names match the REST API wire format exactly, so these structs
// serialize straight into request bodies and out of responses with no
// renaming layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Staff role. Governs authorization on the server side; the client only
/// carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Odontologo,
    Asistente,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Odontologo => "odontologo",
            Self::Asistente => "asistente",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // pad() keeps width specs working, for column output.
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "odontologo" => Ok(Self::Odontologo),
            "asistente" => Ok(Self::Asistente),
            other => Err(format!(
                "rol desconocido '{other}' (use admin, odontologo o asistente)"
            )),
        }
    }
}

/// Staff user record.
///
/// `id`, `username`, and `rol` are the identity fields a login is
/// validated against; the rest is display data with no invariants.
/// Passwords never appear here — they travel only in create/update
/// request bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub nombres: String,
    pub apellidos: String,
    pub username: String,
    pub correo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    pub rol: Role,
    #[serde(default = "default_activo")]
    pub activo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_creacion: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_actualizacion: Option<DateTime<Utc>>,
}

fn default_activo() -> bool {
    true
}

impl User {
    /// Build a user with just the identity fields set. Display fields
    /// start empty; useful as a base for tests and fixtures.
    pub fn new(id: impl Into<String>, username: impl Into<String>, rol: Role) -> Self {
        Self {
            id: id.into(),
            nombres: String::new(),
            apellidos: String::new(),
            username: username.into(),
            correo: String::new(),
            telefono: None,
            rol,
            activo: true,
            fecha_creacion: None,
            fecha_actualizacion: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombres, self.apellidos).trim().to_string()
    }
}

/// Partial user for profile updates. Every field is optional; `None`
/// means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombres: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apellidos: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rol: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
}

impl UserUpdate {
    /// Shallow-merge into `user`: each `Some` field wins, `None` fields
    /// leave the current value in place.
    pub fn merge_into(&self, user: &mut User) {
        if let Some(v) = &self.nombres {
            user.nombres = v.clone();
        }
        if let Some(v) = &self.apellidos {
            user.apellidos = v.clone();
        }
        if let Some(v) = &self.username {
            user.username = v.clone();
        }
        if let Some(v) = &self.correo {
            user.correo = v.clone();
        }
        if let Some(v) = &self.telefono {
            user.telefono = Some(v.clone());
        }
        if let Some(v) = self.rol {
            user.rol = v;
        }
        if let Some(v) = self.activo {
            user.activo = v;
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Patient record, as served by the patients endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub nombres: String,
    pub apellidos: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cedula: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_nacimiento: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(default = "default_activo")]
    pub activo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_creacion: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_actualizacion: Option<DateTime<Utc>>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombres, self.apellidos).trim().to_string()
    }
}
