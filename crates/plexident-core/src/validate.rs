// Staff-form validation, applied before a create or update request is
// sent. Messages are user-facing and returned as a list; an empty list
// means the form is good.

use crate::models::Role;

/// Raw form input for creating or editing a staff user.
#[derive(Debug, Clone, Default)]
pub struct UserForm {
    pub nombres: String,
    pub apellidos: String,
    pub telefono: String,
    pub correo: String,
    pub rol: Option<Role>,
    pub password: String,
    pub confirm_password: String,
}

/// Whether the form creates a new user or edits an existing one. The
/// password is required only for new users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

pub fn validate_user_form(form: &UserForm, mode: FormMode) -> Vec<String> {
    let mut errors = Vec::new();

    if form.nombres.trim().is_empty() {
        errors.push("Nombres es obligatorio".to_string());
    }
    if form.apellidos.trim().is_empty() {
        errors.push("Apellidos es obligatorio".to_string());
    }
    if form.telefono.trim().is_empty() {
        errors.push("Telefono es obligatorio".to_string());
    }
    if form.correo.trim().is_empty() {
        errors.push("Correo electrónico es obligatorio".to_string());
    }
    if form.rol.is_none() {
        errors.push("Rol es obligatorio".to_string());
    }

    if !form.correo.trim().is_empty() && !is_valid_email(form.correo.trim()) {
        errors.push("El correo electrónico no tiene un formato válido".to_string());
    }

    let password_len = form.password.chars().count();
    match mode {
        FormMode::Create => {
            if form.password.is_empty() {
                errors.push("La contraseña es obligatoria para nuevos usuarios".to_string());
            } else if password_len < 6 {
                errors.push("La contraseña debe tener al menos 6 caracteres".to_string());
            }
        }
        FormMode::Edit => {
            if !form.password.is_empty() && password_len < 6 {
                errors.push("La contraseña debe tener al menos 6 caracteres".to_string());
            }
        }
    }

    if form.password != form.confirm_password {
        errors.push("Las contraseñas no coinciden".to_string());
    }

    errors
}

/// One `@`, a dot somewhere inside the domain, no whitespace anywhere.
fn is_valid_email(s: &str) -> bool {
    let mut parts = s.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !local.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.chars().any(char::is_whitespace)
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good_form() -> UserForm {
        UserForm {
            nombres: "Ana".into(),
            apellidos: "Sánchez".into(),
            telefono: "3001234567".into(),
            correo: "ana@clinica.com".into(),
            rol: Some(Role::Asistente),
            password: "secreta9".into(),
            confirm_password: "secreta9".into(),
        }
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        assert!(validate_user_form(&good_form(), FormMode::Create).is_empty());
    }

    #[test]
    fn test_required_fields() {
        let form = UserForm::default();
        let errors = validate_user_form(&form, FormMode::Create);
        assert!(errors.contains(&"Nombres es obligatorio".to_string()));
        assert!(errors.contains(&"Apellidos es obligatorio".to_string()));
        assert!(errors.contains(&"Telefono es obligatorio".to_string()));
        assert!(errors.contains(&"Correo electrónico es obligatorio".to_string()));
        assert!(errors.contains(&"Rol es obligatorio".to_string()));
    }

    #[test]
    fn test_email_format() {
        let mut form = good_form();
        for bad in ["sin-arroba", "dos@@clinica.com", "a@b", "a@.com", "con espacio@x.co"] {
            form.correo = bad.into();
            let errors = validate_user_form(&form, FormMode::Create);
            assert!(
                errors.contains(&"El correo electrónico no tiene un formato válido".to_string()),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_password_required_on_create() {
        let mut form = good_form();
        form.password = String::new();
        form.confirm_password = String::new();
        let errors = validate_user_form(&form, FormMode::Create);
        assert!(errors.contains(&"La contraseña es obligatoria para nuevos usuarios".to_string()));
    }

    #[test]
    fn test_password_min_length() {
        let mut form = good_form();
        form.password = "corta".into();
        form.confirm_password = "corta".into();
        let errors = validate_user_form(&form, FormMode::Create);
        assert!(errors.contains(&"La contraseña debe tener al menos 6 caracteres".to_string()));
    }

    #[test]
    fn test_password_optional_on_edit() {
        let mut form = good_form();
        form.password = String::new();
        form.confirm_password = String::new();
        assert!(validate_user_form(&form, FormMode::Edit).is_empty());

        form.password = "corta".into();
        form.confirm_password = "corta".into();
        let errors = validate_user_form(&form, FormMode::Edit);
        assert!(errors.contains(&"La contraseña debe tener al menos 6 caracteres".to_string()));
    }

    #[test]
    fn test_password_confirmation() {
        let mut form = good_form();
        form.confirm_password = "otra-cosa".into();
        let errors = validate_user_form(&form, FormMode::Create);
        assert!(errors.contains(&"Las contraseñas no coinciden".to_string()));
    }
}
