//! Content type operations
//!
//! Schema changes are admin-only. Reads need any logged-in actor.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::errors::{ServiceError, ServiceResult};
use super::CmsService;
use crate::auth::{require_actor, AccessPolicy, Actor};
use crate::schema::{reflect, validate_definition, ContentTypeDefinition, ContentTypeName};
use crate::sql::{generate_create, generate_drop};
use crate::store::Store;

impl<S: Store, P: AccessPolicy> CmsService<S, P> {
    /// Validates `body` and creates the relation for the new content type.
    pub fn create_content_type(&self, actor: Option<&Actor>, body: &Value) -> ServiceResult<ContentTypeDefinition> {
        let actor = require_actor(actor)?;
        self.policy.can_administer(actor)?;

        let definition = validate_definition(body)?;
        let statement = generate_create(&definition);
        debug!(sql = %statement, "creating content type relation");
        self.execute_on(&definition.name, &statement)?;

        info!(
            content_type = %definition.name,
            fields = definition.fields.len(),
            actor = actor.id,
            "content type created"
        );
        Ok(definition)
    }

    pub fn get_content_type(&self, actor: Option<&Actor>, name: &str) -> ServiceResult<ContentTypeDefinition> {
        require_actor(actor)?;
        let name = ContentTypeName::parse(name)?;
        self.load_definition(&name)
    }

    /// Every content type in the store, ordered by relation name.
    ///
    /// Relations that do not reflect as content types are skipped.
    pub fn list_content_types(&self, actor: Option<&Actor>) -> ServiceResult<Vec<ContentTypeDefinition>> {
        require_actor(actor)?;

        let mut definitions = Vec::new();
        for relation in self.store.list_relations()? {
            let Some(name) = ContentTypeName::from_relation(&relation) else {
                debug!(relation = %relation, "skipping relation without a content type name");
                continue;
            };
            match self.load_definition(&name) {
                Ok(definition) => definitions.push(definition),
                Err(ServiceError::StoreFailure(e)) => {
                    warn!(relation = %relation, error = %e, "relation does not reflect as a content type");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(definitions)
    }

    /// Drops a content type and every record in it.
    pub fn drop_content_type(&self, actor: Option<&Actor>, name: &str) -> ServiceResult<()> {
        let actor = require_actor(actor)?;
        self.policy.can_administer(actor)?;

        let name = ContentTypeName::parse(name)?;
        // Existence only; a drifted relation must still be droppable.
        self.store
            .describe_columns(&name.relation_name())
            .map_err(|e| ServiceError::on_relation(e, &name))?;

        for statement in generate_drop([&name]) {
            self.execute_on(&name, &statement)?;
        }

        info!(content_type = %name, actor = actor.id, "content type dropped");
        Ok(())
    }

    /// Reflects `name`'s current definition from the store.
    pub(crate) fn load_definition(&self, name: &ContentTypeName) -> ServiceResult<ContentTypeDefinition> {
        let columns = self
            .store
            .describe_columns(&name.relation_name())
            .map_err(|e| ServiceError::on_relation(e, name))?;
        Ok(reflect(name, &columns)?)
    }
}
