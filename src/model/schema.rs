//! Registry of known properties and their kinds.
//!
//! The registry decides whether a property is a scalar, a list or a map, and
//! which singular statement names add one entry to a collection
//! (`proguardFile 'x'` adds to `proguardFiles`). Properties that are not
//! registered get their kind inferred from what the document contains.

use crate::base::{PropertyPath, ScopePath};

/// Shape of a logical property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Scalar,
    List { singular: Option<&'static str> },
    Map { singular: Option<&'static str> },
}

impl PropertyKind {
    pub const LIST: Self = Self::List { singular: None };
    pub const MAP: Self = Self::Map { singular: None };

    pub fn singular(self) -> Option<&'static str> {
        match self {
            Self::Scalar => None,
            Self::List { singular } | Self::Map { singular } => singular,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::List { .. } => "list",
            Self::Map { .. } => "map",
        }
    }
}

/// One registered property: a scope pattern (`/`-separated, `*` matches
/// one segment), a name and a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaEntry {
    pub scope: &'static str,
    pub name: &'static str,
    pub kind: PropertyKind,
}

impl SchemaEntry {
    pub const fn new(scope: &'static str, name: &'static str, kind: PropertyKind) -> Self {
        Self { scope, name, kind }
    }
}

const fn entry(scope: &'static str, name: &'static str, kind: PropertyKind) -> SchemaEntry {
    SchemaEntry::new(scope, name, kind)
}

const PROGUARD_FILES: PropertyKind = PropertyKind::List {
    singular: Some("proguardFile"),
};
const CONSUMER_PROGUARD_FILES: PropertyKind = PropertyKind::List {
    singular: Some("consumerProguardFile"),
};
const RES_CONFIGS: PropertyKind = PropertyKind::List {
    singular: Some("resConfig"),
};
const RUNNER_ARGUMENTS: PropertyKind = PropertyKind::Map {
    singular: Some("testInstrumentationRunnerArgument"),
};

/// Collections of the Android plugin's `android` block.
static ANDROID_ENTRIES: &[SchemaEntry] = &[
    entry("android", "flavorDimensions", PropertyKind::LIST),
    entry("android/defaultConfig", "proguardFiles", PROGUARD_FILES),
    entry("android/defaultConfig", "consumerProguardFiles", CONSUMER_PROGUARD_FILES),
    entry("android/defaultConfig", "resConfigs", RES_CONFIGS),
    entry("android/defaultConfig", "manifestPlaceholders", PropertyKind::MAP),
    entry("android/defaultConfig", "testInstrumentationRunnerArguments", RUNNER_ARGUMENTS),
    entry("android/productFlavors/*", "proguardFiles", PROGUARD_FILES),
    entry("android/productFlavors/*", "consumerProguardFiles", CONSUMER_PROGUARD_FILES),
    entry("android/productFlavors/*", "resConfigs", RES_CONFIGS),
    entry("android/productFlavors/*", "manifestPlaceholders", PropertyKind::MAP),
    entry("android/productFlavors/*", "testInstrumentationRunnerArguments", RUNNER_ARGUMENTS),
    entry("android/buildTypes/*", "proguardFiles", PROGUARD_FILES),
    entry("android/buildTypes/*", "consumerProguardFiles", CONSUMER_PROGUARD_FILES),
    entry("android/buildTypes/*", "manifestPlaceholders", PropertyKind::MAP),
];

/// Property registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    entries: Vec<SchemaEntry>,
}

impl Default for Schema {
    /// The Android plugin registry.
    fn default() -> Self {
        Self {
            entries: ANDROID_ENTRIES.to_vec(),
        }
    }
}

impl Schema {
    /// A registry with no entries; every kind is inferred.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with(mut self, entry: SchemaEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// Registered kind of `path`, if any.
    pub fn kind_of(&self, path: &PropertyPath) -> Option<PropertyKind> {
        self.entries
            .iter()
            .find(|e| e.name == path.name && scope_matches(e.scope, &path.scope))
            .map(|e| e.kind)
    }
}

fn scope_matches(pattern: &str, scope: &ScopePath) -> bool {
    let segments = scope.segments();
    if pattern.is_empty() {
        return segments.is_empty();
    }
    let parts: Vec<&str> = pattern.split('/').collect();
    parts.len() == segments.len()
        && parts
            .iter()
            .zip(segments)
            .all(|(part, segment)| *part == "*" || *part == segment.as_str())
}
