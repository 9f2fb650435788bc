use std::collections::HashMap;

use super::matcher::path_matches;
use crate::models::Role;

/// Routes every role can reach.
const COMMON: &[&str] = &["/dashboard", "/perfil-usuario"];

/// Own travel requests, shared by applicants and both authorizer levels.
const TRAVELER: &[&str] = &[
    "/crear-solicitud",
    "/historial",
    "/reembolso",
    "/solicitudes-draft",
    "/comprobar-gastos",
    "/completar-draft/*",
    "/editar-solicitud/*",
    "/comprobar-solicitud/*",
    "/detalles-solicitud/*",
    "/subir-comprobante/*",
];

const AUTHORIZER: &[&str] = &[
    "/solicitudes-autorizador",
    "/autorizaciones",
    "/autorizar-solicitud/*",
];

const APPLICANT_ONLY: &[&str] = &["/resubir-comprobante/*"];

const TRAVEL_AGENCY: &[&str] = &["/atenciones", "/atender-solicitud/*"];

const ACCOUNTS_PAYABLE: &[&str] = &[
    "/cotizaciones",
    "/comprobaciones",
    "/cotizar-solicitud/*",
    "/comprobar-gastos/*",
];

const ADMIN: &[&str] = &["/crear-usuario", "/editar-usuario/*"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteTableError {
    #[error("role `{0}` has no entry in the route table")]
    MissingRole(Role),
    #[error("invalid route pattern `{pattern}` for role `{role}`")]
    InvalidPattern { role: Role, pattern: String },
}

/// RouteTable
///
/// Maps every [`Role`] to the path patterns it may visit, and keeps the union of all
/// patterns so the middleware can tell "exists for nobody" from "exists, not for you".
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<Role, Vec<String>>,
    all: Vec<String>,
}

impl RouteTable {
    /// new
    ///
    /// Validates and builds a table. Every role needs an entry (possibly empty), every
    /// pattern must be absolute, and `*` may only appear as a trailing `/*`.
    pub fn new(routes: HashMap<Role, Vec<String>>) -> Result<Self, RouteTableError> {
        for role in Role::ALL {
            let patterns = routes.get(&role).ok_or(RouteTableError::MissingRole(role))?;

            if let Some(bad) = patterns.iter().find(|p| !is_valid_pattern(p)) {
                return Err(RouteTableError::InvalidPattern {
                    role,
                    pattern: bad.clone(),
                });
            }
        }

        Ok(Self::build(routes))
    }

    /// The travel portal's own table.
    pub fn standard() -> Self {
        Self::build(standard_entries())
    }

    fn build(routes: HashMap<Role, Vec<String>>) -> Self {
        let mut all: Vec<String> = Vec::new();
        for role in Role::ALL {
            for pattern in routes.get(&role).into_iter().flatten() {
                if !all.contains(pattern) {
                    all.push(pattern.clone());
                }
            }
        }

        Self { routes, all }
    }

    /// routes_for
    ///
    /// Looks up the raw role string from the cookie. Strings that are not a known role
    /// get an empty list, which denies every role-gated path.
    pub fn routes_for(&self, role: &str) -> &[String] {
        role.parse::<Role>()
            .ok()
            .and_then(|role| self.routes.get(&role))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Union of every role's patterns, without duplicates.
    pub fn all_routes(&self) -> &[String] {
        &self.all
    }

    /// True if some role in the table can reach `path`.
    pub fn is_known(&self, path: &str) -> bool {
        path_matches(path, &self.all)
    }

    pub fn is_allowed(&self, role: &str, path: &str) -> bool {
        path_matches(path, self.routes_for(role))
    }
}

fn is_valid_pattern(pattern: &str) -> bool {
    if !pattern.starts_with('/') {
        return false;
    }
    match pattern.find('*') {
        None => true,
        Some(idx) => idx == pattern.len() - 1 && pattern.ends_with("/*"),
    }
}

/// standard_entries
///
/// Raw entries behind [`RouteTable::standard`], exposed so the table can be checked
/// through [`RouteTable::new`] or extended before building.
pub fn standard_entries() -> HashMap<Role, Vec<String>> {
    let list = |groups: &[&[&str]]| -> Vec<String> {
        groups
            .iter()
            .flat_map(|group| group.iter())
            .map(|p| p.to_string())
            .collect()
    };

    HashMap::from([
        (Role::Solicitante, list(&[COMMON, TRAVELER, APPLICANT_ONLY])),
        (Role::AgenciaDeViajes, list(&[COMMON, TRAVEL_AGENCY])),
        (Role::CuentasPorPagar, list(&[COMMON, ACCOUNTS_PAYABLE])),
        (Role::N1, list(&[COMMON, AUTHORIZER, TRAVELER])),
        (Role::N2, list(&[COMMON, AUTHORIZER, TRAVELER])),
        (Role::Administrador, list(&[COMMON, ADMIN])),
    ])
}
