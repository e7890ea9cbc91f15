//! Generic resource CRUD flows
//!
//! One parameterized implementation of the mutation side of every screen:
//! call the backend, flash the outcome, redirect back to the list (whose
//! GET is the refetch). Screens instantiate a [`ScreenDef`] and keep only
//! their form parsing and validation local.

use axum::response::Response;
use serde::Serialize;
use tera::Context as TeraContext;

use crate::backend::Resource;
use crate::web::flash::Flash;
use crate::web::middleware::{fail, redirect_with_flash, screen, AppState, CurrentSession};

/// Static description of one resource screen.
pub struct ScreenDef {
    pub resource: &'static Resource,
    /// Singular label used in flash messages and the confirm page
    pub entity: &'static str,
    /// Path segment under `/{locale}/admin`
    pub slug: &'static str,
}

impl ScreenDef {
    pub fn list_path(&self, locale: &str) -> String {
        format!("/{}/admin/{}", locale, self.slug)
    }

    fn action_path(&self, locale: &str, id: &str, action: &str) -> String {
        format!(
            "/{}/admin/{}/{}/{}",
            locale,
            self.slug,
            urlencoding::encode(id),
            action
        )
    }
}

/// Create a record and return to the list with a flash.
pub async fn create<B: Serialize>(
    state: &AppState,
    session: &CurrentSession,
    locale: &str,
    def: &ScreenDef,
    body: &B,
) -> Response {
    let back = def.list_path(locale);
    match state
        .backend
        .create(session.token(), def.resource, body)
        .await
    {
        Ok(_) => redirect_with_flash(&back, Flash::success(format!("{} created", title(def.entity)))),
        Err(e) => fail(locale, &back, e),
    }
}

/// Update a record and return to the list with a flash.
pub async fn update<B: Serialize>(
    state: &AppState,
    session: &CurrentSession,
    locale: &str,
    def: &ScreenDef,
    id: &str,
    body: &B,
) -> Response {
    let back = def.list_path(locale);
    match state
        .backend
        .update(session.token(), def.resource, id, body)
        .await
    {
        Ok(_) => redirect_with_flash(&back, Flash::success(format!("{} updated", title(def.entity)))),
        Err(e) => fail(locale, &back, e),
    }
}

/// Render the confirmation page guarding a delete.
pub fn confirm_delete(state: &AppState, locale: &str, def: &ScreenDef, id: &str) -> Response {
    let mut context = TeraContext::new();
    context.insert("entity", def.entity);
    context.insert("action", &def.action_path(locale, id, "delete"));
    context.insert("cancel", &def.list_path(locale));
    screen(state, locale, "confirm_delete.html", context, None)
}

/// Delete a record (after confirmation) and return to the list.
pub async fn delete(
    state: &AppState,
    session: &CurrentSession,
    locale: &str,
    def: &ScreenDef,
    id: &str,
) -> Response {
    let back = def.list_path(locale);
    match state
        .backend
        .remove(session.token(), def.resource, id)
        .await
    {
        Ok(()) => redirect_with_flash(&back, Flash::success(format!("{} deleted", title(def.entity)))),
        Err(e) => fail(locale, &back, e),
    }
}

fn title(entity: &str) -> String {
    let mut chars = entity.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::resources;

    #[test]
    fn paths_are_locale_scoped() {
        let def = ScreenDef {
            resource: &resources::GIFTS,
            entity: "gift code",
            slug: "gifts",
        };
        assert_eq!(def.list_path("fr"), "/fr/admin/gifts");
        assert_eq!(def.action_path("en", "g1", "delete"), "/en/admin/gifts/g1/delete");
    }

    #[test]
    fn flash_labels_are_capitalized() {
        assert_eq!(title("gift code"), "Gift code");
        assert_eq!(title(""), "");
    }
}
