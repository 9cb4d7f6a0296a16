use super::files::{self, FILES_ROOT};
use super::{Client, RepoPath};
use crate::Result;
use crate::extract::{self, Labels, Object};
use crate::matrix::{FIXED_INSTANCE_KEY, Matrices, Matrix};
use crate::reports::family_name;
use crate::schema::{ConfigNode, Element, build_element_tree, walk};
use ohno::{IntoAppError, app_err, bail};
use std::collections::HashMap;

const LOG_TARGET: &str = " collector";

/// Polls a set of schema roots for one repository and keeps their matrices.
#[derive(Debug)]
pub struct Collector {
    repo: RepoPath,
    roots: Vec<Element>,
    matrices: Matrices,
    files: bool,
}

impl Collector {
    /// Build one schema and one matrix per counters root.
    ///
    /// Roots whose schema declares no direct key element get the fixed instance up front;
    /// every metric element in a root's tree gets a metric descriptor.
    pub fn new(repo: RepoPath, counters: &[ConfigNode], files: bool) -> Result<Self> {
        let mut roots = Vec::with_capacity(counters.len());
        let mut matrices = Matrices::new();

        for node in counters {
            let elem = build_element_tree(node);

            if matrices.contains(elem.name()) || (files && elem.name() == FILES_ROOT) {
                bail!("duplicate counters root '{}'", elem.name());
            }

            if files && elem.display_name() == FILES_ROOT {
                bail!("counters root '{}' is displayed as '{FILES_ROOT}', which is reserved for file scans", elem.name());
            }

            let matrix = new_root_matrix(&repo, &elem)?;
            warn_skipped_siblings(&elem);

            matrices.insert(elem.name(), matrix);
            roots.push(elem);
        }

        if files {
            matrices.insert(FILES_ROOT, files::new_files_matrix(&repo)?);
        }

        check_exposed_names(&matrices)?;

        Ok(Self {
            repo,
            roots,
            matrices,
            files,
        })
    }

    #[must_use]
    pub const fn repo(&self) -> &RepoPath {
        &self.repo
    }

    /// Schema roots in declaration order
    #[must_use]
    pub fn roots(&self) -> &[Element] {
        &self.roots
    }

    #[must_use]
    pub fn root(&self, name: &str) -> Option<&Element> {
        self.roots.iter().find(|r| r.name() == name)
    }

    /// Look a root up by name, falling back to its display name
    #[must_use]
    pub fn find_root(&self, name: &str) -> Option<&Element> {
        self.root(name).or_else(|| self.roots.iter().find(|r| r.display_name() == name))
    }

    #[must_use]
    pub const fn files_enabled(&self) -> bool {
        self.files
    }

    #[must_use]
    pub const fn matrices(&self) -> &Matrices {
        &self.matrices
    }

    /// Extract one already fetched payload for `root`.
    ///
    /// Roots with nested keys expect a JSON array of objects, every other root a single object.
    pub fn ingest(&mut self, root: &str, data: &[u8]) -> Result<()> {
        let elem = self
            .roots
            .iter()
            .find(|r| r.name() == root)
            .ok_or_else(|| app_err!("unknown counters root '{root}'"))?;

        let objects: Vec<Object> = if elem.has_nested_keys() {
            log::debug!(target: LOG_TARGET, "({root}) unmarshalling json into list");
            serde_json::from_slice(data).into_app_err_with(|| format!("parsing payload for '{root}' as a list of objects"))?
        } else {
            log::debug!(target: LOG_TARGET, "({root}) unmarshalling json into object");
            vec![serde_json::from_slice(data).into_app_err_with(|| format!("parsing payload for '{root}' as an object"))?]
        };

        for object in &objects {
            extract::extract(&mut self.matrices, root, elem, object, None, &Labels::new())
                .into_app_err_with(|| format!("extracting payload for '{root}'"))?;
        }

        Ok(())
    }

    /// Fetch and extract `root`; a non-200 response yields `None` without touching the matrix.
    pub async fn poll(&mut self, client: &Client, root: &str) -> Result<Option<&Matrix>> {
        let display_name = self
            .root(root)
            .map(|r| r.display_name().to_string())
            .ok_or_else(|| app_err!("unknown counters root '{root}'"))?;

        log::info!(target: LOG_TARGET, "[{root}] ({display_name}) starting poll");

        let (status, data) = client.get(root).await?;
        if status != 200 {
            log::warn!(target: LOG_TARGET, "[{root}] API response: {status}");
            return Ok(None);
        }

        self.ingest(root, &data)?;
        Ok(self.matrices.get(root))
    }

    /// Scan repository files into the files matrix
    pub async fn poll_files(&mut self, client: &Client) -> Result<&Matrix> {
        let matrix = self
            .matrices
            .get_mut(FILES_ROOT)
            .filter(|_| self.files)
            .ok_or_else(|| app_err!("file scanning is not enabled"))?;

        log::info!(target: LOG_TARGET, "[{FILES_ROOT}] starting scan");
        files::scan(client, matrix).await?;
        Ok(matrix)
    }
}

fn new_root_matrix(repo: &RepoPath, elem: &Element) -> Result<Matrix> {
    let mut matrix = Matrix::new(format!("Github.{}", elem.name()), elem.display_name());
    matrix.set_global_label("repo", repo.to_string());

    if elem.has_nested_keys() {
        log::debug!(target: LOG_TARGET, "[{}] ({}) will use parsed instance keys", elem.name(), elem.display_name());
    } else {
        log::debug!(target: LOG_TARGET, "[{}] ({}) will use single instance ({FIXED_INSTANCE_KEY})", elem.name(), elem.display_name());
        let _ = matrix.new_instance(FIXED_INSTANCE_KEY)?;
    }

    for metric in elem.metric_elements() {
        log::debug!(target: LOG_TARGET, "({}) => metric [{}] ({})", elem.name(), metric.name(), metric.display_name());
        let _ = matrix
            .new_metric(metric.name(), metric.display_name())
            .into_app_err_with(|| format!("registering metrics for '{}'", elem.name()))?;
    }

    Ok(matrix)
}

/// Every metric must be exposed under a distinct `<object>_<metric>` name.
fn check_exposed_names(matrices: &Matrices) -> Result<()> {
    let mut seen = HashMap::new();

    for (root, matrix) in matrices.iter() {
        for (_, metric) in matrix.metrics() {
            let name = family_name(matrix.object(), metric.name());
            if let Some(previous) = seen.insert(name.clone(), root) {
                bail!("metric '{name}' is exposed by both '{previous}' and '{root}'");
            }
        }
    }

    Ok(())
}

/// Only the first nested child of an element is ever extracted; make the others visible.
fn warn_skipped_siblings(root: &Element) {
    walk(root, &mut |elem| {
        if elem.nested_child_count() > 1 {
            let skipped: Vec<_> = elem.children().iter().filter(|c| c.is_nested()).skip(1).map(Element::name).collect();
            log::warn!(
                target: LOG_TARGET,
                "({}) only the first nested field is extracted, ignoring {skipped:?}",
                elem.name()
            );
        }
    });
}
