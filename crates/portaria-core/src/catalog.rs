//! Service kinds and categories offered by the ticket form.
//!
//! The lists are suggestions: the `services` table stores free text.

use serde::Serialize;

use crate::types::Role;

/// Service kinds handled by the reception desk.
pub const RECEPTION_SERVICES: &[&str] = &["Laser", "Correios", "Entregador"];

/// Service kinds handled by the maintenance desk.
pub const MAINTENANCE_SERVICES: &[&str] = &[
    "Trocar Lâmpada",
    "Inspeção de Vazamento",
    "Atendimento de Segurança",
    "Desligar Disjuntor",
    "Religar Disjuntor",
    "Acompanhamento de Refrigeração",
    "Acompanhamento de Internet",
    "Acompanhamento Manutenção",
    "Abertura de Registro",
    "Fechamento de Registro",
];

/// Ticket categories.
pub const CATEGORIES: &[&str] = &["Manutenção", "Recepção", "Administração", "Sistema"];

/// A group of service kinds belonging to one desk.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceGroup {
    /// Desk label.
    pub label: &'static str,
    /// Role that staffs the desk.
    pub role: Role,
    /// Service kinds.
    pub services: &'static [&'static str],
}

/// A role offered by the user form.
#[derive(Debug, Clone, Serialize)]
pub struct RoleOption {
    /// Stored value.
    pub value: Role,
    /// Label.
    pub label: &'static str,
}

/// Everything the forms offer as choices.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    /// Service kinds by desk.
    pub services: Vec<ServiceGroup>,
    /// Ticket categories.
    pub categories: &'static [&'static str],
    /// Assignable roles.
    pub roles: Vec<RoleOption>,
}

impl Catalog {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        Self {
            services: vec![
                ServiceGroup {
                    label: Role::Reception.display_name(),
                    role: Role::Reception,
                    services: RECEPTION_SERVICES,
                },
                ServiceGroup {
                    label: Role::Maintenance.display_name(),
                    role: Role::Maintenance,
                    services: MAINTENANCE_SERVICES,
                },
            ],
            categories: CATEGORIES,
            roles: Role::ALL
                .into_iter()
                .map(|value| RoleOption {
                    value,
                    label: value.display_name(),
                })
                .collect(),
        }
    }
}
