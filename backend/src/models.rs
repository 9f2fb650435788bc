use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Roles ---

/// Role
///
/// The closed set of user categories in the travel portal. The serialized form is the
/// exact string the backend writes into the `role` cookie, so it doubles as the
/// Route Table key and the sidebar key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum Role {
    /// Employee submitting travel requests.
    #[serde(rename = "Solicitante")]
    Solicitante,
    /// First-level authorizer.
    #[serde(rename = "N1")]
    N1,
    /// Second-level authorizer.
    #[serde(rename = "N2")]
    N2,
    /// User management.
    #[serde(rename = "Administrador")]
    Administrador,
    /// Accounts payable: budgets and receipt validation.
    #[serde(rename = "Cuentas por pagar")]
    CuentasPorPagar,
    /// Travel agency attending approved requests.
    #[serde(rename = "Agencia de viajes")]
    AgenciaDeViajes,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Solicitante,
        Role::N1,
        Role::N2,
        Role::Administrador,
        Role::CuentasPorPagar,
        Role::AgenciaDeViajes,
    ];

    /// The wire name, as stored in the `role` cookie.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Solicitante => "Solicitante",
            Role::N1 => "N1",
            Role::N2 => "N2",
            Role::Administrador => "Administrador",
            Role::CuentasPorPagar => "Cuentas por pagar",
            Role::AgenciaDeViajes => "Agencia de viajes",
        }
    }

    /// Human readable label shown in the portal header and user menu.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Solicitante => "Solicitante",
            Role::N1 => "Autorizador N1",
            Role::N2 => "Autorizador N2",
            Role::Administrador => "Administrador",
            Role::CuentasPorPagar => "Cuentas por Pagar",
            Role::AgenciaDeViajes => "Agencia de Viajes",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role string is not one of the six wire names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

// --- Session ---

/// Session
///
/// Identity and authorization facts carried by the browser's cookies. It is rebuilt
/// on every request and never stored server-side.
///
/// `role` is kept exactly as the cookie delivered it. Nothing here checks it against
/// [`Role`]; an unrecognized value simply finds no Route Table entry later on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Session {
    pub username: String,
    pub id: String,
    pub role: String,
    pub department_id: Option<String>,
    pub token: String,
}

impl Session {
    /// Fixed low-privilege session used by the development bypass.
    pub fn mock() -> Self {
        Self {
            username: "John Doe".to_string(),
            id: "1".to_string(),
            role: Role::Solicitante.as_str().to_string(),
            department_id: Some("1".to_string()),
            token: "token".to_string(),
        }
    }

    /// Parsed role, if the cookie held one of the known wire names.
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    pub fn has_role(&self) -> bool {
        !self.role.is_empty()
    }

    /// A role cookie alone is enough; so is a token alone.
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty() || !self.role.is_empty()
    }
}

// --- Sidebar ---

/// MenuItem
///
/// One entry of the portal sidebar. Served as JSON from `GET /menu` so the frontend
/// does not keep its own copy of the per-role navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MenuItem {
    pub label: String,
    pub route: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl MenuItem {
    fn new(label: &str, route: &str, icon: &str, category: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            route: route.to_string(),
            icon: icon.to_string(),
            category: category.map(str::to_string),
        }
    }
}

/// Sidebar entries for a role, in display order.
pub fn sidebar_for(role: Role) -> Vec<MenuItem> {
    let dashboard = MenuItem::new("Dashboard", "/dashboard", "home", None);

    // Shared by everyone who can file their own travel requests.
    let traveler = || {
        vec![
            MenuItem::new("Crear Solicitud", "/crear-solicitud", "flight", Some("Viajes")),
            MenuItem::new("Draft Solicitudes", "/solicitudes-draft", "draft", Some("Viajes")),
            MenuItem::new("Historial De Viajes", "/historial", "inventory", Some("Viajes")),
            MenuItem::new("Comprobar Gastos", "/comprobar-gastos", "payments", Some("Gastos")),
            MenuItem::new("Reembolsos", "/reembolso", "paid", Some("Gastos")),
        ]
    };

    let mut items = vec![dashboard];
    match role {
        Role::Solicitante => items.extend(traveler()),
        Role::N1 | Role::N2 => {
            items.push(MenuItem::new(
                "Autorizaciones",
                "/autorizaciones",
                "check_box",
                Some("Autorizaciones"),
            ));
            items.push(MenuItem::new(
                "Solicitudes",
                "/solicitudes-autorizador",
                "check_box",
                Some("Autorizaciones"),
            ));
            items.extend(traveler());
        }
        Role::CuentasPorPagar => {
            items.push(MenuItem::new("Cotizaciones", "/cotizaciones", "paid", Some("Pagos")));
            items.push(MenuItem::new(
                "Comprobaciones",
                "/comprobaciones",
                "receipt",
                Some("Pagos"),
            ));
        }
        Role::AgenciaDeViajes => items.push(MenuItem::new(
            "Atenciones",
            "/atenciones",
            "breaking_news_alt_1",
            Some("Gestión"),
        )),
        Role::Administrador => items.push(MenuItem::new(
            "Crear Usuario",
            "/crear-usuario",
            "manage_accounts",
            Some("Gestión"),
        )),
    }
    items
}
