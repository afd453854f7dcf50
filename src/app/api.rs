use crate::app::constants::DEFAULT_ENTRY_NAME;
use crate::app::errors::{AppError, AppResult};
use crate::app::logger::LOGGER;
use crate::app::options::ConnectionConfig;
use crate::app::registry;
use crate::app::types::{FirebaseApp, FirebaseAppConfig, FirebaseAppSettings};
use crate::component::ComponentContainer;

fn normalize_name(settings: &FirebaseAppSettings) -> AppResult<String> {
    let name = settings
        .name
        .clone()
        .unwrap_or_else(|| DEFAULT_ENTRY_NAME.to_string());
    if name.trim().is_empty() {
        return Err(AppError::BadAppName { app_name: name });
    }
    Ok(name)
}

/// Creates and registers a new app.
///
/// Registration is strict: if an app with the same name is already
/// registered the call fails with [`AppError::DuplicateApp`], whatever its
/// options. The name check and the insertion happen under one lock, so of
/// several racing callers exactly one succeeds.
pub fn initialize_app(
    options: ConnectionConfig,
    settings: Option<FirebaseAppSettings>,
) -> AppResult<FirebaseApp> {
    let settings = settings.unwrap_or_default();
    let name = normalize_name(&settings)?;
    let automatic = settings.automatic_data_collection_enabled.unwrap_or(true);
    let config = FirebaseAppConfig::new(name.clone(), automatic);

    let mut apps = registry::apps_guard();
    if apps.contains_key(&name) {
        return Err(AppError::DuplicateApp { app_name: name });
    }

    let app = FirebaseApp::new(options, config, ComponentContainer::new(name.clone()));
    for component in registry::registered_components() {
        registry::add_component(&app, &component);
    }
    apps.insert(name, app.clone());

    LOGGER.debug(format!("FirebaseApp {} initialized", app.name()));
    Ok(app)
}

pub fn get_app(name: Option<&str>) -> AppResult<FirebaseApp> {
    let lookup = name.unwrap_or(DEFAULT_ENTRY_NAME);
    registry::apps_guard()
        .get(lookup)
        .cloned()
        .ok_or_else(|| AppError::NoApp {
            app_name: lookup.to_string(),
        })
}

pub fn get_apps() -> Vec<FirebaseApp> {
    registry::apps_guard().values().cloned().collect()
}

/// Removes the app from the registry and drops every service it created.
/// Deleting an app that is no longer registered is a no-op.
pub fn delete_app(app: &FirebaseApp) -> AppResult<()> {
    let removed = {
        let mut apps = registry::apps_guard();
        let is_current = apps
            .get(app.name())
            .is_some_and(|registered| registered.ptr_eq(app));
        if is_current {
            apps.remove(app.name())
        } else {
            None
        }
    };

    if removed.is_some() {
        let container = app.container();
        for provider in container.get_providers() {
            provider.delete();
        }
        container.detach_root_service();
        app.set_is_deleted(true);
        LOGGER.debug(format!("FirebaseApp {} deleted", app.name()));
    }

    Ok(())
}
