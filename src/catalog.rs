use anyhow::{bail, Result};

/// One way of launching an application: a label shown in the menu and the
/// shell command line handed verbatim to the process runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub label: String,
    pub command_line: String,
}

impl Variant {
    pub fn new(label: impl Into<String>, command_line: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command_line: command_line.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub name: String,
    pub icon_reference: String,
    pub variants: Vec<Variant>,
}

impl Application {
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }
}

/// Ordered, non-empty list of applications. Built once at start-up and only
/// read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    applications: Vec<Application>,
}

impl Catalog {
    pub fn new(applications: Vec<Application>) -> Result<Self> {
        if applications.is_empty() {
            bail!("no applications configured");
        }
        if let Some(app) = applications.iter().find(|app| app.variants.is_empty()) {
            bail!("application '{}' has no launch variants", app.name);
        }
        Ok(Self { applications })
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Application> {
        self.applications.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Application> {
        self.applications.iter()
    }

    pub fn variant_count(&self, app_idx: usize) -> usize {
        self.get(app_idx).map(Application::variant_count).unwrap_or(0)
    }

    pub fn variant(&self, app_idx: usize, variant_idx: usize) -> Option<&Variant> {
        self.get(app_idx)?.variants.get(variant_idx)
    }
}
