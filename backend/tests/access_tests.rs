use std::collections::HashMap;
use travel_portal::{
    Role, RouteTable,
    access::{PUBLIC_ROUTES, RouteTableError, path_matches, standard_entries},
};

// --- Path Matcher ---

#[test]
fn test_exact_pattern_matches_only_itself() {
    let patterns = ["/dashboard"];
    assert!(path_matches("/dashboard", &patterns));
    assert!(!path_matches("/dashboard/", &patterns));
    assert!(!path_matches("/dashboards", &patterns));
    assert!(!path_matches("/", &patterns));
}

#[test]
fn test_wildcard_requires_trailing_slash() {
    let patterns = ["/editar-solicitud/*"];
    assert!(path_matches("/editar-solicitud/", &patterns));
    assert!(path_matches("/editar-solicitud/42", &patterns));
    assert!(path_matches("/editar-solicitud/42/pasos/3", &patterns));

    // No sibling or bare-base leaks.
    assert!(!path_matches("/editar-solicitud", &patterns));
    assert!(!path_matches("/editar-solicitudes", &patterns));
    assert!(!path_matches("/editar-solicitudX/1", &patterns));
}

#[test]
fn test_star_without_slash_is_literal() {
    assert!(path_matches("/foo*", &["/foo*"]));
    assert!(!path_matches("/foobar", &["/foo*"]));
}

#[test]
fn test_any_pattern_in_list_is_enough() {
    let patterns = ["/login", "/404", "/detalles-solicitud/*"];
    assert!(path_matches("/404", &patterns));
    assert!(path_matches("/detalles-solicitud/7", &patterns));
    assert!(!path_matches("/dashboard", &patterns));
}

#[test]
fn test_empty_pattern_list_matches_nothing() {
    let none: Vec<String> = Vec::new();
    assert!(!path_matches("/dashboard", &none));
    assert!(!path_matches("/", &none));
}

#[test]
fn test_public_routes_are_login_and_404() {
    assert_eq!(PUBLIC_ROUTES, ["/login", "/404"]);
}

// --- Route Table ---

#[test]
fn test_standard_table_passes_validation() {
    assert!(RouteTable::new(standard_entries()).is_ok());
}

#[test]
fn test_every_role_has_an_entry() {
    let table = RouteTable::standard();
    for role in Role::ALL {
        assert!(
            !table.routes_for(role.as_str()).is_empty(),
            "{role} has no routes"
        );
        assert!(table.is_allowed(role.as_str(), "/dashboard"));
        assert!(table.is_allowed(role.as_str(), "/perfil-usuario"));
    }
}

#[test]
fn test_missing_role_is_rejected() {
    let mut entries = standard_entries();
    entries.remove(&Role::N2);

    assert_eq!(
        RouteTable::new(entries).unwrap_err(),
        RouteTableError::MissingRole(Role::N2)
    );
}

#[test]
fn test_malformed_patterns_are_rejected() {
    for bad in ["dashboard", "/foo*", "/a/*/b", "/*/x"] {
        let mut entries = standard_entries();
        entries.get_mut(&Role::Administrador).unwrap().push(bad.to_string());

        assert_eq!(
            RouteTable::new(entries).unwrap_err(),
            RouteTableError::InvalidPattern {
                role: Role::Administrador,
                pattern: bad.to_string(),
            },
            "{bad} should be rejected"
        );
    }
}

#[test]
fn test_empty_role_entry_is_allowed() {
    let mut entries: HashMap<Role, Vec<String>> =
        Role::ALL.into_iter().map(|r| (r, Vec::new())).collect();
    entries.insert(Role::Solicitante, vec!["/dashboard".to_string()]);

    let table = RouteTable::new(entries).unwrap();
    assert!(table.is_allowed("Solicitante", "/dashboard"));
    assert!(!table.is_allowed("N1", "/dashboard"));
    assert_eq!(table.all_routes(), ["/dashboard".to_string()]);
}

#[test]
fn test_all_routes_is_deduplicated_union() {
    let table = RouteTable::standard();
    let all = table.all_routes();

    for role in Role::ALL {
        for pattern in table.routes_for(role.as_str()) {
            assert!(all.contains(pattern), "{pattern} missing from union");
        }
    }

    let dashboards = all.iter().filter(|p| p.as_str() == "/dashboard").count();
    assert_eq!(dashboards, 1);
}

#[test]
fn test_unknown_role_string_gets_no_routes() {
    let table = RouteTable::standard();
    assert!(table.routes_for("Gerente").is_empty());
    assert!(table.routes_for("").is_empty());
    // Wire names are exact.
    assert!(table.routes_for("solicitante").is_empty());
    assert!(table.routes_for("Cuentas Por Pagar").is_empty());
    assert!(!table.is_allowed("Gerente", "/dashboard"));
}

#[test]
fn test_every_pattern_authorizes_its_role() {
    let table = RouteTable::standard();

    for role in Role::ALL {
        for pattern in table.routes_for(role.as_str()) {
            match pattern.strip_suffix('*') {
                Some(base_with_slash) => {
                    let concrete = format!("{base_with_slash}123");
                    assert!(table.is_allowed(role.as_str(), &concrete), "{role} {concrete}");

                    // The pattern alone never covers its bare base.
                    let bare = base_with_slash.trim_end_matches('/');
                    assert!(!path_matches(bare, &[pattern]), "{pattern} matched {bare}");
                }
                None => assert!(table.is_allowed(role.as_str(), pattern), "{role} {pattern}"),
            }
        }
    }
}

#[test]
fn test_role_specific_routes() {
    let table = RouteTable::standard();

    assert!(table.is_allowed("Solicitante", "/crear-solicitud"));
    assert!(table.is_allowed("Solicitante", "/resubir-comprobante/9"));
    assert!(!table.is_allowed("Solicitante", "/autorizar-solicitud/42"));

    assert!(table.is_allowed("N1", "/autorizar-solicitud/42"));
    assert!(table.is_allowed("N2", "/autorizaciones"));
    assert!(!table.is_allowed("N1", "/resubir-comprobante/9"));

    assert!(table.is_allowed("Cuentas por pagar", "/comprobar-gastos/5"));
    assert!(!table.is_allowed("Cuentas por pagar", "/comprobar-gastos"));

    assert!(table.is_allowed("Agencia de viajes", "/atender-solicitud/3"));
    assert!(table.is_allowed("Administrador", "/editar-usuario/1"));
    assert!(!table.is_allowed("Administrador", "/crear-solicitud"));
}

#[test]
fn test_is_known_spans_all_roles() {
    let table = RouteTable::standard();
    assert!(table.is_known("/autorizar-solicitud/42"));
    assert!(table.is_known("/crear-usuario"));
    assert!(!table.is_known("/no-existe"));
    assert!(!table.is_known("/autorizar-solicitud"));
    // Public routes are not part of any role table.
    assert!(!table.is_known("/login"));
}
