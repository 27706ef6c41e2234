//! Group management.

use crate::domain::{Group, NewGroup, UserId};
use crate::error::{DomainError, RepoError};

use super::ContentStore;

#[derive(Debug, Clone, Default)]
pub struct GroupDraft {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl GroupDraft {
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            description: description.into(),
        }
    }
}

#[derive(Clone)]
pub struct GroupService {
    store: ContentStore,
}

impl GroupService {
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }

    pub async fn create_group(
        &self,
        actor: Option<UserId>,
        draft: GroupDraft,
    ) -> Result<Group, DomainError> {
        let creator = actor.ok_or(DomainError::AuthRequired)?;
        let new_group = NewGroup::new(&draft.title, &draft.slug, &draft.description)?;

        let group = self.store.groups.create(new_group).await.map_err(|e| match e {
            RepoError::Unique(_) => {
                DomainError::Duplicate(format!("group with slug `{}` already exists", draft.slug.trim()))
            }
            other => other.into(),
        })?;

        tracing::info!(group = %group.slug, creator = %creator, "Group created");
        Ok(group)
    }

    /// Every group, ordered by title.
    pub async fn list_groups(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.store.groups.list().await?)
    }
}
