//! Employee draft, role handling, and field normalization.
//!
//! A draft is what the form produces: raw field values plus the role. It
//! validates the role-dependent required fields and composes the stored
//! record (phone with country code, sanitized salary, `"start-end"`
//! schedule).

use crate::entities::empleados;

/// Staff roles. CLIENTE is the customer role and carries a different set of
/// required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Administrador,
    Domiciliario,
    Cocinero,
    Mesero,
    Cliente,
}

impl Role {
    /// All roles, in the order the selector offers them.
    pub const ALL: [Role; 5] = [
        Role::Administrador,
        Role::Domiciliario,
        Role::Cocinero,
        Role::Mesero,
        Role::Cliente,
    ];

    /// Storage/display form of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrador => "ADMINISTRADOR",
            Role::Domiciliario => "DOMICILIARIO",
            Role::Cocinero => "COCINERO",
            Role::Mesero => "MESERO",
            Role::Cliente => "CLIENTE",
        }
    }

    /// Parse the storage form back into a role.
    pub fn parse(s: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.as_str() == s)
    }

    /// Whether this role requires an address instead of salary/schedule.
    pub fn is_client(&self) -> bool {
        matches!(self, Role::Cliente)
    }
}

/// Country codes offered by the phone selector.
pub const COUNTRY_CODES: [&str; 4] = ["+1", "+52", "+57", "+58"];

/// In-progress employee data as entered in the form.
#[derive(Debug, Clone)]
pub struct EmployeeDraft {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub phone_country_code: String,
    pub phone: String,
    pub address: String,
    pub salary: String,
    pub schedule_start: String,
    pub schedule_end: String,
    pub email: String,
}

impl EmployeeDraft {
    /// Check role-dependent required fields.
    ///
    /// Returns the user-facing message for the first failure; no remote call
    /// may be made when this fails.
    pub fn validate(&self) -> Result<(), &'static str> {
        let missing = |s: &str| s.trim().is_empty();

        if self.role.is_client() {
            if missing(&self.name) || missing(&self.phone) || missing(&self.address) || missing(&self.email) {
                return Err("Por favor complete todos los campos obligatorios para el empleado.");
            }
        } else if missing(&self.name)
            || missing(&self.phone)
            || missing(&self.salary)
            || missing(&self.schedule_start)
            || missing(&self.schedule_end)
            || missing(&self.email)
        {
            return Err("Por favor complete todos los campos obligatorios para el rol seleccionado.");
        }

        Ok(())
    }

    /// Compose the stored record from the draft.
    ///
    /// Phone becomes country code + local number; salary keeps digits and
    /// decimal point only; schedule becomes `"start-end"`. Fields the role
    /// does not use are stored as NULL.
    pub fn into_record(self) -> empleados::Model {
        let is_client = self.role.is_client();

        empleados::Model {
            id: self.id,
            name: self.name,
            role: self.role.as_str().to_string(),
            phone: format!("{}{}", self.phone_country_code, self.phone),
            address: if is_client { Some(self.address) } else { None },
            salary: if is_client {
                None
            } else {
                Some(sanitize_salary(&self.salary))
            },
            schedule: if is_client {
                None
            } else {
                Some(format!("{}-{}", self.schedule_start, self.schedule_end))
            },
            email: self.email,
        }
    }
}

/// Strip everything but digits and the decimal point from a salary value.
pub fn sanitize_salary(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Decompose a stored phone into (country code, local number).
///
/// Prefers the selector's known codes (longest first), then any leading
/// `+` followed by 1-3 digits. Numbers without a prefix default to "+1"
/// with the value unchanged.
pub fn split_phone(phone: &str) -> (String, String) {
    if let Some(rest) = phone.strip_prefix('+') {
        let mut codes = COUNTRY_CODES;
        codes.sort_by_key(|c| std::cmp::Reverse(c.len()));
        for code in codes {
            if let Some(local) = phone.strip_prefix(code) {
                return (code.to_string(), local.to_string());
            }
        }

        let digits: String = rest.chars().take(3).take_while(|c| c.is_ascii_digit()).collect();
        if !digits.is_empty() {
            let code_len = 1 + digits.len();
            return (phone[..code_len].to_string(), phone[code_len..].to_string());
        }
    }

    ("+1".to_string(), phone.to_string())
}

/// Decompose a stored schedule into (start, end), splitting once on `-`.
pub fn split_schedule(schedule: &str) -> (String, String) {
    match schedule.split_once('-') {
        Some((start, end)) => (start.to_string(), end.to_string()),
        None => (schedule.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(role: Role) -> EmployeeDraft {
        EmployeeDraft {
            id: "00000001".to_string(),
            name: "Ana Torres".to_string(),
            role,
            phone_country_code: "+57".to_string(),
            phone: "3001234567".to_string(),
            address: "Calle 10 #4-21".to_string(),
            salary: "$2,000".to_string(),
            schedule_start: "9:00 AM".to_string(),
            schedule_end: "5:00 PM".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    #[test]
    fn test_validate_staff_requires_each_field() {
        for field in ["name", "phone", "salary", "schedule_start", "schedule_end", "email"] {
            let mut d = draft(Role::Mesero);
            match field {
                "name" => d.name.clear(),
                "phone" => d.phone.clear(),
                "salary" => d.salary.clear(),
                "schedule_start" => d.schedule_start.clear(),
                "schedule_end" => d.schedule_end.clear(),
                "email" => d.email.clear(),
                _ => unreachable!(),
            }
            assert!(d.validate().is_err(), "{field} should be required");
        }

        // Address is not required for staff roles
        let mut d = draft(Role::Cocinero);
        d.address.clear();
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_validate_client_requires_each_field() {
        for field in ["name", "phone", "address", "email"] {
            let mut d = draft(Role::Cliente);
            match field {
                "name" => d.name.clear(),
                "phone" => d.phone.clear(),
                "address" => d.address.clear(),
                "email" => d.email.clear(),
                _ => unreachable!(),
            }
            assert!(d.validate().is_err(), "{field} should be required");
        }

        // Salary and schedule are not required for clients
        let mut d = draft(Role::Cliente);
        d.salary.clear();
        d.schedule_start.clear();
        d.schedule_end.clear();
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_into_record_staff() {
        let record = draft(Role::Mesero).into_record();

        assert_eq!(record.phone, "+573001234567");
        assert_eq!(record.salary.as_deref(), Some("2000"));
        assert_eq!(record.schedule.as_deref(), Some("9:00 AM-5:00 PM"));
        assert_eq!(record.address, None);
        assert_eq!(record.role, "MESERO");
    }

    #[test]
    fn test_into_record_client() {
        let record = draft(Role::Cliente).into_record();

        assert_eq!(record.address.as_deref(), Some("Calle 10 #4-21"));
        assert_eq!(record.salary, None);
        assert_eq!(record.schedule, None);
    }

    #[test]
    fn test_sanitize_salary() {
        assert_eq!(sanitize_salary("$2,000"), "2000");
        assert_eq!(sanitize_salary("1234.5"), "1234.5");
        assert_eq!(sanitize_salary(""), "");
    }

    #[test]
    fn test_split_phone_known_code() {
        let (code, local) = split_phone("+573001234567");
        assert_eq!(code, "+57");
        assert_eq!(local, "3001234567");
    }

    #[test]
    fn test_split_phone_without_prefix_defaults() {
        let (code, local) = split_phone("3001234567");
        assert_eq!(code, "+1");
        assert_eq!(local, "3001234567");
    }

    #[test]
    fn test_split_phone_unknown_code_takes_digits() {
        let (code, local) = split_phone("+3491234567");
        assert_eq!(code, "+349");
        assert_eq!(local, "1234567");
    }

    #[test]
    fn test_split_schedule() {
        let (start, end) = split_schedule("9:00 AM-5:00 PM");
        assert_eq!(start, "9:00 AM");
        assert_eq!(end, "5:00 PM");

        let (start, end) = split_schedule("no separator");
        assert_eq!(start, "no separator");
        assert_eq!(end, "");
    }

    #[test]
    fn test_role_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("UNKNOWN"), None);
    }
}
