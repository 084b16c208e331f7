//! Marketplace plugin entries. Plugins are not versioned.

use serde::{Deserialize, Serialize};

use super::entity::{
    CatalogEntity, EntityUpdate, EntityUpload, Example, merge_non_empty, merge_supplied,
    normalized_id, present, require_author, require_fields,
};
use super::kind::CatalogKind;
use crate::Result;

/// A marketplace plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plugin {
    /// Unique id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Category label.
    #[serde(default)]
    pub category: String,
    /// Marketplace the plugin is published in.
    #[serde(default)]
    pub marketplace: String,
    /// Slash command that installs the plugin.
    #[serde(default)]
    pub install_command: String,
    /// Feature bullet points.
    #[serde(default)]
    pub features: Vec<String>,
    /// Bundled agents.
    #[serde(default)]
    pub agents: Vec<String>,
    /// Bundled skills.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Usage examples.
    #[serde(default)]
    pub examples: Vec<Example>,
    /// Last modification time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Last modifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl Plugin {
    /// Default install command for a plugin in a marketplace.
    #[must_use]
    pub fn default_install_command(id: &str, marketplace: &str) -> String {
        format!("/install-plugin {id}@{marketplace}")
    }
}

impl CatalogEntity for Plugin {
    const KIND: CatalogKind = CatalogKind::Plugin;
    type Summary = Self;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn summary(&self) -> Self {
        self.clone()
    }

    fn touch(&mut self, updated_at: &str, updated_by: &str) {
        self.updated_at = Some(updated_at.to_string());
        self.updated_by = Some(updated_by.to_string());
    }
}

/// Request body for creating a plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginUpload {
    /// Unique id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category (defaults to `Other`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Marketplace name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace: Option<String>,
    /// Install command override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_command: Option<String>,
    /// Features.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    /// Agents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<Vec<String>>,
    /// Skills.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    /// Usage examples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,
    /// Author identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

impl EntityUpload<Plugin> for PluginUpload {
    fn into_entity(self, now: &str) -> Result<Plugin> {
        require_fields(&[
            ("id", present(self.id.as_ref())),
            ("name", present(self.name.as_ref())),
            ("marketplace", present(self.marketplace.as_ref())),
        ])?;
        let author = require_author(self.author_name.as_deref())?;
        let id = normalized_id(self.id);
        let marketplace = self.marketplace.unwrap_or_default();

        Ok(Plugin {
            install_command: self
                .install_command
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| Plugin::default_install_command(&id, &marketplace)),
            id,
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            category: self
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "Other".to_string()),
            marketplace,
            features: self.features.unwrap_or_default(),
            agents: self.agents.unwrap_or_default(),
            skills: self.skills.unwrap_or_default(),
            examples: self.examples.unwrap_or_default(),
            updated_at: Some(now.to_string()),
            updated_by: Some(author),
        })
    }
}

/// Request body for updating a plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginUpdate {
    /// Id of the plugin to update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// New name (ignored when empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New category (ignored when empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New marketplace (ignored when empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketplace: Option<String>,
    /// New install command (ignored when empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_command: Option<String>,
    /// New features.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    /// New agents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<Vec<String>>,
    /// New skills.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    /// New examples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,
    /// Author identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

impl EntityUpdate<Plugin> for PluginUpdate {
    fn target_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn author(&self) -> Option<&str> {
        self.author_name.as_deref()
    }

    fn merge_metadata(&self, entity: &mut Plugin) {
        merge_non_empty(&mut entity.name, self.name.as_ref());
        merge_supplied(&mut entity.description, self.description.as_ref());
        merge_non_empty(&mut entity.category, self.category.as_ref());
        merge_non_empty(&mut entity.marketplace, self.marketplace.as_ref());
        merge_non_empty(&mut entity.install_command, self.install_command.as_ref());
        merge_supplied(&mut entity.features, self.features.as_ref());
        merge_supplied(&mut entity.agents, self.agents.as_ref());
        merge_supplied(&mut entity.skills, self.skills.as_ref());
        merge_supplied(&mut entity.examples, self.examples.as_ref());
    }
}
