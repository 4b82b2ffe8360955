//! Open-document handle: a project plus its storage backing.
//!
//! A document is either in-memory (new, unsaved work) or file-backed.
//! Every committed mutation bumps the version counter, which is what
//! autosave and collaboration layers key off.

use std::fs;
use std::path::{Path, PathBuf};

use pagecraft_document::{ComponentRegistry, Project};
use pagecraft_serializer::{project_from_json, project_to_json};
use pagecraft_validator::ValidationReport;
use tracing::info;

use crate::errors::EditorError;

/// Where a document's project lives
#[derive(Debug)]
pub enum DocumentStorage {
    /// Unsaved, in-memory only
    Memory { project: Project },

    /// Backed by a project file on disk
    File {
        path: PathBuf,
        project: Project,
        dirty: bool,
    },
}

/// An open project document
#[derive(Debug)]
pub struct Document {
    /// Monotonic counter, bumped on every committed mutation
    pub version: u64,
    storage: DocumentStorage,
}

impl Document {
    /// Wrap an in-memory project
    pub fn from_project(project: Project) -> Self {
        Self {
            version: 0,
            storage: DocumentStorage::Memory { project },
        }
    }

    /// Load a project file from disk.
    ///
    /// Recoverable problems (unknown component types, orphan promotion)
    /// come back in the report; structural errors fail the load.
    pub fn load(
        path: impl AsRef<Path>,
        registry: &ComponentRegistry,
    ) -> Result<(Self, ValidationReport), EditorError> {
        let path = path.as_ref().to_path_buf();
        let json = fs::read_to_string(&path)?;
        let (project, report) = project_from_json(&json, registry)?;
        info!(path = %path.display(), project = %project.id, "loaded project");
        Ok((
            Self {
                version: 0,
                storage: DocumentStorage::File {
                    path,
                    project,
                    dirty: false,
                },
            },
            report,
        ))
    }

    /// Write the project back to its file
    pub fn save(&mut self) -> Result<(), EditorError> {
        match &mut self.storage {
            DocumentStorage::Memory { .. } => Err(EditorError::NotFileBacked),
            DocumentStorage::File {
                path,
                project,
                dirty,
            } => {
                let json = project_to_json(project)?;
                fs::write(&*path, json)?;
                *dirty = false;
                info!(path = %path.display(), "saved project");
                Ok(())
            }
        }
    }

    /// Attach the document to a new file path and write it
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), EditorError> {
        let path = path.as_ref().to_path_buf();
        let project = match &self.storage {
            DocumentStorage::Memory { project } => project.clone(),
            DocumentStorage::File { project, .. } => project.clone(),
        };
        self.storage = DocumentStorage::File {
            path,
            project,
            dirty: true,
        };
        self.save()
    }

    pub fn project(&self) -> &Project {
        match &self.storage {
            DocumentStorage::Memory { project } => project,
            DocumentStorage::File { project, .. } => project,
        }
    }

    /// Mutable project access. Callers commit changes with
    /// [`Document::touch`]; this accessor alone does not mark dirty.
    pub fn project_mut(&mut self) -> &mut Project {
        match &mut self.storage {
            DocumentStorage::Memory { project } => project,
            DocumentStorage::File { project, .. } => project,
        }
    }

    /// Commit a mutation: bump the version and mark file storage dirty
    pub fn touch(&mut self) {
        self.version += 1;
        match &mut self.storage {
            DocumentStorage::Memory { project } => project.touch(),
            DocumentStorage::File { project, dirty, .. } => {
                project.touch();
                *dirty = true;
            }
        }
    }

    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::Memory { .. } => false,
            DocumentStorage::File { dirty, .. } => *dirty,
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        match &self.storage {
            DocumentStorage::Memory { .. } => None,
            DocumentStorage::File { path, .. } => Some(path),
        }
    }
}
