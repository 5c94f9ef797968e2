//! Process wide cache of operation definitions

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use super::Operation;
use crate::definition::{Declaration, Definition};
use crate::error::Result;

static DEFINITIONS: LazyLock<RwLock<HashMap<TypeId, Arc<Definition>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Definition for `O`, declared on first use
///
/// Failed declarations are not cached, so every lookup reports them again.
pub(crate) fn definition_for<O: Operation>() -> Result<Arc<Definition>> {
    let id = TypeId::of::<O>();

    if let Some(definition) = DEFINITIONS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
    {
        return Ok(Arc::clone(definition));
    }

    let definition = O::declare(Declaration::new(O::name()))
        .map_err(|report| report.attach(format!("While declaring operation \"{}\"", O::name())))?
        .build();

    tracing::debug!(
        operation = definition.name(),
        arguments = definition.argument_names().count(),
        rescues = definition.rescue_policy().len(),
        reports_errors = definition.reports_errors(),
        "Registered operation definition"
    );

    let mut definitions = DEFINITIONS.write().unwrap_or_else(PoisonError::into_inner);
    Ok(Arc::clone(
        definitions.entry(id).or_insert_with(|| Arc::new(definition)),
    ))
}
