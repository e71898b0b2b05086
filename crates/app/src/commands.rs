//! Command implementations.

use std::sync::Arc;

use tracing::{info, warn};

use scopebind_application::ResourceEditor;
use scopebind_application::expression::compute_expression;
use scopebind_application::ports::{IdGenerator, SharedStore, SnapshotRepository};
use scopebind_application::scope::build_scope;
use scopebind_domain::{
    DraftField, EditorSettings, InstanceSelector, ResourceHeader, ResourceMethod,
};
use scopebind_infrastructure::{
    FileSnapshotRepository, InMemoryStore, UuidIdGenerator, to_json_stable,
};

use crate::cli::{Cli, Commands};
use crate::error::CliError;

/// Runs one command and returns what to print.
pub async fn run(cli: Cli, settings: EditorSettings) -> Result<String, CliError> {
    let repo = FileSnapshotRepository::new();
    let store = Arc::new(InMemoryStore::from_snapshot(repo.load(&cli.snapshot).await?));

    match cli.command {
        Commands::Scope { selector, exclude } => {
            let selector = resolve_selector(&store, selector.as_deref())?;
            let scope = build_scope(
                selector.as_ref(),
                &store.variable_values(),
                &store.data_sources(),
                exclude.as_deref(),
            );
            render(&scope)
        }
        Commands::Eval {
            expression,
            selector,
            exclude,
        } => {
            let selector = resolve_selector(&store, selector.as_deref())?;
            let scope = build_scope(
                selector.as_ref(),
                &store.variable_values(),
                &store.data_sources(),
                exclude.as_deref(),
            );
            let value =
                compute_expression(&expression, &scope, &settings.evaluation_error_placeholder);
            render(&value)
        }
        Commands::SaveResource {
            variable,
            name,
            url,
            method,
            headers,
            body,
        } => {
            let mut editor = ResourceEditor::open(
                Arc::clone(&store),
                Arc::new(UuidIdGenerator::new()),
                settings,
                variable.as_deref(),
            )?;
            if let Some(name) = name {
                editor.set_field(DraftField::Name(name));
            }
            if let Some(url) = url {
                editor.set_field(DraftField::Url(url));
            }
            if let Some(method) = method {
                editor.set_field(DraftField::Method(method.parse::<ResourceMethod>()?));
            }
            if let Some(body) = body {
                editor.set_field(DraftField::Body(body));
            }
            if !headers.is_empty() {
                apply_headers(&mut editor, &headers)?;
            }

            let Some(committed) = editor.save()? else {
                warn!("no instance selected, nothing saved");
                editor.close();
                return Ok("null".to_string());
            };
            editor.close();

            repo.save(&cli.snapshot, &store.snapshot()).await?;
            info!(path = %cli.snapshot.display(), "snapshot updated");
            render(&serde_json::json!({
                "variable": committed.variable,
                "resource": committed.resource,
            }))
        }
        Commands::Select { selector } => {
            let selector = selector
                .as_deref()
                .map(InstanceSelector::parse)
                .transpose()?;
            store.select(selector.clone());
            repo.save(&cli.snapshot, &store.snapshot()).await?;
            render(&selector)
        }
    }
}

fn resolve_selector(
    store: &InMemoryStore,
    selector: Option<&str>,
) -> Result<Option<InstanceSelector>, CliError> {
    match selector {
        Some(path) => Ok(Some(InstanceSelector::parse(path)?)),
        None => Ok(store.selected_instance()),
    }
}

fn apply_headers<S, G>(editor: &mut ResourceEditor<S, G>, headers: &[String]) -> Result<(), CliError>
where
    S: SharedStore + ?Sized,
    G: IdGenerator + ?Sized,
{
    let parsed = headers
        .iter()
        .map(|raw| parse_header(raw))
        .collect::<Result<Vec<_>, _>>()?;

    while !editor.draft().headers.is_empty() {
        editor.remove_header(0)?;
    }
    for (index, header) in parsed.into_iter().enumerate() {
        editor.add_header();
        editor.set_header(index, header.name, header.value)?;
    }
    Ok(())
}

fn parse_header(raw: &str) -> Result<ResourceHeader, CliError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::MalformedHeader(raw.to_string()))?;
    Ok(ResourceHeader::new(name.trim(), value))
}

fn render<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    Ok(to_json_stable(value)?.trim_end().to_string())
}
