//! Output filename composition
//!
//! [`NameComposer`] turns (variation, object) pairs into filenames. It is a
//! pure function of its inputs. [`plan_file_names`] applies it to a whole job
//! and resolves collisions between the resulting names.

use crate::domain::job::{ExportJob, NamingOptions};
use std::collections::HashSet;

/// Keep only ASCII alphanumerics, space, hyphen, underscore and period, then trim
///
/// ```
/// use paramsweep::core::export::naming::sanitize;
///
/// assert_eq!(sanitize(" M6/Hole #2 "), "M6Hole 2");
/// ```
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Builds filenames for one job
#[derive(Debug, Clone)]
pub struct NameComposer<'a> {
    naming: &'a NamingOptions,
    parameter_name: &'a str,
    multi_object: bool,
    extension: &'a str,
}

impl<'a> NameComposer<'a> {
    /// Create a composer
    ///
    /// `multi_object` controls whether the object name is part of the
    /// filename; `extension` includes the leading dot.
    pub fn new(
        naming: &'a NamingOptions,
        parameter_name: &'a str,
        multi_object: bool,
        extension: &'a str,
    ) -> Self {
        Self {
            naming,
            parameter_name,
            multi_object,
            extension,
        }
    }

    /// Create a composer configured from a job
    pub fn for_job(job: &'a ExportJob) -> Self {
        Self::new(
            &job.naming,
            job.parameter_name.as_str(),
            job.is_multi_object(),
            job.format.extension(),
        )
    }

    /// Compose the filename for a variation and object
    ///
    /// Parts, in order: prefix, `NNN` (1-based variation number when
    /// numbering is on), parameter name, variation, object name (multi-object
    /// jobs only), suffix. Empty parts are skipped; the rest are joined with
    /// `_`. A variation that sanitizes to nothing becomes `variant_N`.
    ///
    /// ```
    /// use paramsweep::core::export::naming::NameComposer;
    /// use paramsweep::domain::NamingOptions;
    ///
    /// let naming = NamingOptions {
    ///     prefix: "part".to_string(),
    ///     add_numbering: true,
    ///     ..Default::default()
    /// };
    /// let composer = NameComposer::new(&naming, "color", false, ".stl");
    /// assert_eq!(composer.compose(0, "Red", "Case"), "part_001_Red.stl");
    /// ```
    pub fn compose(&self, variation_index: usize, variation: &str, object_name: &str) -> String {
        let mut safe_variation = sanitize(variation);
        if safe_variation.is_empty() {
            safe_variation = format!("variant_{}", variation_index + 1);
        }

        let mut parts: Vec<String> = Vec::with_capacity(6);

        parts.push(sanitize(&self.naming.prefix));

        if self.naming.add_numbering {
            parts.push(format!("{:03}", variation_index + 1));
        }

        if self.naming.include_parameter_name {
            parts.push(sanitize(self.parameter_name));
        }

        parts.push(safe_variation);

        if self.multi_object {
            parts.push(sanitize(object_name));
        }

        parts.push(sanitize(&self.naming.suffix));

        let stem = parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("_");

        format!("{stem}{}", self.extension)
    }
}

/// A filename assigned to one (variation, target) unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Index into the job's variations
    pub variation_index: usize,

    /// Index into the job's targets
    pub target_index: usize,

    /// Final filename (no directory)
    pub file_name: String,

    /// Whether a collision suffix was added
    pub disambiguated: bool,
}

/// Filenames for every unit of a job, in sweep order
#[derive(Debug, Clone, Default)]
pub struct FilePlan {
    files: Vec<PlannedFile>,
    targets_per_variation: usize,
}

impl FilePlan {
    /// Planned file for a unit
    pub fn get(&self, variation_index: usize, target_index: usize) -> Option<&PlannedFile> {
        self.files
            .get(variation_index * self.targets_per_variation + target_index)
    }

    /// All planned files in (variation, target) order
    pub fn files(&self) -> &[PlannedFile] {
        &self.files
    }

    /// Number of names that needed a collision suffix
    pub fn collisions(&self) -> usize {
        self.files.iter().filter(|f| f.disambiguated).count()
    }

    /// Number of planned files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the plan is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Compose every filename of a job and make them unique
///
/// A name equal (ignoring ASCII case) to one planned earlier gets `_2`,
/// `_3`, ... inserted before the extension. Planning walks units in sweep
/// order, so the first occurrence keeps the plain name and reruns of the same
/// job produce the same names.
pub fn plan_file_names(job: &ExportJob) -> FilePlan {
    let composer = NameComposer::for_job(job);
    let extension = job.format.extension();
    let mut seen: HashSet<String> = HashSet::new();
    let mut files = Vec::with_capacity(job.total_operations());

    for (vi, variation) in job.variations.iter().enumerate() {
        for (ti, target) in job.targets.iter().enumerate() {
            let composed = composer.compose(vi, variation, &target.display_name);
            let mut file_name = composed.clone();
            let mut disambiguated = false;

            if seen.contains(&file_name.to_ascii_lowercase()) {
                let stem = composed
                    .strip_suffix(extension)
                    .unwrap_or(composed.as_str())
                    .to_string();
                let mut n = 2;
                loop {
                    let candidate = format!("{stem}_{n}{extension}");
                    if !seen.contains(&candidate.to_ascii_lowercase()) {
                        file_name = candidate;
                        break;
                    }
                    n += 1;
                }
                disambiguated = true;
                tracing::warn!(
                    variation = %variation,
                    target = %target.display_name,
                    original = %composed,
                    file_name = %file_name,
                    "Filename collision, added disambiguating suffix"
                );
            }

            seen.insert(file_name.to_ascii_lowercase());
            files.push(PlannedFile {
                variation_index: vi,
                target_index: ti,
                file_name,
                disambiguated,
            });
        }
    }

    FilePlan {
        files,
        targets_per_variation: job.targets.len(),
    }
}
