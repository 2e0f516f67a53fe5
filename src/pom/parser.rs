// src/pom/parser.rs
//! Descriptor parsing: file → coordinates + raw declarations.

use super::interpolate;
use super::xml::{self, Element};
use super::{Declarations, DependencyDecl, ParentRef, PluginDecl, PomModel, ProfileDecl};
use crate::error::{PomError, Result};
use crate::gav::Gav;
use std::fs;
use std::path::Path;

/// Output of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDescriptor {
    pub gav: Gav,
    pub parent: Option<Gav>,
    pub model: PomModel,
}

/// Turns a descriptor file into its coordinates and raw declarations.
pub trait DescriptorParser {
    /// # Errors
    /// Returns `PomError::Parse` when the file cannot be read or understood.
    fn parse(&self, path: &Path) -> Result<ParsedDescriptor>;
}

/// Reads Maven `pom.xml` / `*.pom` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PomXmlParser;

impl DescriptorParser for PomXmlParser {
    fn parse(&self, path: &Path) -> Result<ParsedDescriptor> {
        let content = fs::read_to_string(path).map_err(|e| parse_error(path, e.to_string()))?;
        parse_str(&content).map_err(|message| parse_error(path, message))
    }
}

fn parse_error(path: &Path, message: String) -> PomError {
    PomError::Parse {
        path: path.to_path_buf(),
        message,
    }
}

/// Parses descriptor text.
///
/// # Errors
/// Returns a message describing malformed XML or missing coordinates.
pub fn parse_str(content: &str) -> std::result::Result<ParsedDescriptor, String> {
    let root = xml::parse(content).map_err(|e| format!("malformed xml: {e}"))?;
    if root.name != "project" {
        return Err(format!("root element is <{}>, expected <project>", root.name));
    }
    let model = read_model(&root)?;
    let gav = own_gav(&model)?;
    let parent = model.parent.as_ref().map(|p| p.gav.clone());
    Ok(ParsedDescriptor { gav, parent, model })
}

fn read_model(root: &Element) -> std::result::Result<PomModel, String> {
    let parent = root.child("parent").map(read_parent).transpose()?;
    let profiles = root
        .child("profiles")
        .map(|p| p.children_named("profile").map(read_profile).collect())
        .unwrap_or_default();

    Ok(PomModel {
        group_id: root.child_text("groupId"),
        artifact_id: root.child_text("artifactId"),
        version: root.child_text("version"),
        parent,
        declarations: read_declarations(root),
        profiles,
    })
}

fn read_parent(el: &Element) -> std::result::Result<ParentRef, String> {
    let field = |name: &str| {
        el.child_text(name)
            .ok_or_else(|| format!("parent declaration without {name}"))
    };
    Ok(ParentRef {
        gav: Gav {
            group_id: field("groupId")?,
            artifact_id: field("artifactId")?,
            version: field("version")?,
        },
        relative_path: el.child("relativePath").map(|r| r.text.trim().to_string()),
    })
}

fn read_profile(el: &Element) -> ProfileDecl {
    ProfileDecl {
        id: el.child_text("id").unwrap_or_else(|| "default".to_string()),
        declarations: read_declarations(el),
    }
}

/// Reads the declaration blocks shared by `<project>` and `<profile>`.
fn read_declarations(el: &Element) -> Declarations {
    let properties = el
        .child("properties")
        .map(|p| {
            p.children
                .iter()
                .map(|c| (c.name.clone(), c.text.trim().to_string()))
                .collect()
        })
        .unwrap_or_default();

    Declarations {
        properties,
        dependency_management: read_dependencies(el.descend("dependencyManagement/dependencies")),
        dependencies: read_dependencies(el.child("dependencies")),
        plugins: read_plugins(el.descend("build/plugins")),
        plugin_management: read_plugins(el.descend("build/pluginManagement/plugins")),
    }
}

fn read_dependencies(list: Option<&Element>) -> Vec<DependencyDecl> {
    let Some(list) = list else { return Vec::new() };
    list.children_named("dependency")
        .filter_map(|d| {
            Some(DependencyDecl {
                group_id: d.child_text("groupId")?,
                artifact_id: d.child_text("artifactId")?,
                version: d.child_text("version"),
                scope: d.child_text("scope"),
                classifier: d.child_text("classifier"),
                kind: d.child_text("type"),
            })
        })
        .collect()
}

fn read_plugins(list: Option<&Element>) -> Vec<PluginDecl> {
    let Some(list) = list else { return Vec::new() };
    list.children_named("plugin")
        .filter_map(|p| {
            Some(PluginDecl {
                group_id: p.child_text("groupId"),
                artifact_id: p.child_text("artifactId")?,
                version: p.child_text("version"),
            })
        })
        .collect()
}

/// Own coordinates, inheriting groupId/version from the parent declaration
/// and interpolating against the descriptor's own properties.
fn own_gav(model: &PomModel) -> std::result::Result<Gav, String> {
    let parent = model.parent.as_ref().map(|p| &p.gav);
    let artifact_id = model
        .artifact_id
        .clone()
        .ok_or_else(|| "missing artifactId".to_string())?;
    let group_id = model
        .group_id
        .clone()
        .or_else(|| parent.map(|p| p.group_id.clone()))
        .ok_or_else(|| "missing groupId and no parent to inherit it from".to_string())?;
    let version = model
        .version
        .clone()
        .or_else(|| parent.map(|p| p.version.clone()))
        .ok_or_else(|| "missing version and no parent to inherit it from".to_string())?;

    let raw = Gav {
        group_id,
        artifact_id,
        version,
    };
    let props = interpolate::own_properties(&raw, parent, &model.declarations);
    Ok(Gav {
        group_id: interpolate::interpolate(&raw.group_id, &props),
        artifact_id: interpolate::interpolate(&raw.artifact_id, &props),
        version: interpolate::interpolate(&raw.version, &props),
    })
}
