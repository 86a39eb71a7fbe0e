//! Typed accessors for the Android plugin's `android` block.
//!
//! Each model wraps a [`BlockHandle`]; accessors are thin conversions over
//! [`PropertyHandle`](super::PropertyHandle) reads and writes.

use super::handle::BlockHandle;
use crate::document::Document;
use crate::dsl::Value;
use crate::error::DslError;
use indexmap::IndexMap;
use smol_str::SmolStr;

/// Getter, setter and remover for a scalar property.
macro_rules! scalar_property {
    ($name:literal: $ty:ty, $get:ident, $set:ident, $remove:ident) => {
        pub fn $get(&self, doc: &Document) -> Result<Option<$ty>, DslError> {
            self.block.property($name).get(doc)
        }

        pub fn $set(&self, doc: &mut Document, value: impl Into<$ty>) -> Result<(), DslError> {
            let value: $ty = value.into();
            self.block.property($name).set_value(doc, Value::from(value))
        }

        pub fn $remove(&self, doc: &mut Document) -> Result<(), DslError> {
            self.block.property($name).delete(doc)
        }
    };
}

/// Getter and entry operations for a list of strings.
macro_rules! list_property {
    ($name:literal, $get:ident, $add:ident, $remove:ident, $replace:ident, $remove_all:ident) => {
        pub fn $get(&self, doc: &Document) -> Result<Option<Vec<String>>, DslError> {
            self.block.property($name).list(doc)
        }

        pub fn $add(&self, doc: &mut Document, value: impl Into<String>) -> Result<(), DslError> {
            self.block
                .property($name)
                .add_list_value(doc, Into::<String>::into(value))
        }

        pub fn $remove(
            &self,
            doc: &mut Document,
            value: impl Into<String>,
        ) -> Result<(), DslError> {
            self.block
                .property($name)
                .remove_list_value(doc, Into::<String>::into(value))
        }

        pub fn $replace(
            &self,
            doc: &mut Document,
            old: impl Into<String>,
            new: impl Into<String>,
        ) -> Result<(), DslError> {
            self.block
                .property($name)
                .replace_list_value(doc, Into::<String>::into(old), Into::<String>::into(new))
        }

        pub fn $remove_all(&self, doc: &mut Document) -> Result<(), DslError> {
            self.block.property($name).delete(doc)
        }
    };
}

/// Getter and entry operations for a map.
macro_rules! map_property {
    ($name:literal, $get:ident, $set_entry:ident, $remove_entry:ident, $remove_all:ident) => {
        pub fn $get(&self, doc: &Document) -> Result<Option<IndexMap<SmolStr, Value>>, DslError> {
            self.block.property($name).map(doc)
        }

        pub fn $set_entry(
            &self,
            doc: &mut Document,
            key: impl Into<SmolStr>,
            value: impl Into<Value>,
        ) -> Result<(), DslError> {
            self.block.property($name).set_map_entry(doc, key, value)
        }

        pub fn $remove_entry(
            &self,
            doc: &mut Document,
            key: impl Into<SmolStr>,
        ) -> Result<(), DslError> {
            self.block.property($name).remove_map_entry(doc, key)
        }

        pub fn $remove_all(&self, doc: &mut Document) -> Result<(), DslError> {
            self.block.property($name).delete(doc)
        }
    };
}

/// The `android { }` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndroidModel {
    block: BlockHandle,
}

impl AndroidModel {
    pub(crate) fn new(block: BlockHandle) -> Self {
        Self { block }
    }

    pub fn block(&self) -> &BlockHandle {
        &self.block
    }

    scalar_property!("buildToolsVersion": String, build_tools_version, set_build_tools_version, remove_build_tools_version);
    scalar_property!("compileSdkVersion": String, compile_sdk_version, set_compile_sdk_version, remove_compile_sdk_version);
    scalar_property!("defaultPublishConfig": String, default_publish_config, set_default_publish_config, remove_default_publish_config);
    scalar_property!("generatePureSplits": bool, generate_pure_splits, set_generate_pure_splits, remove_generate_pure_splits);
    scalar_property!("publishNonDefault": bool, publish_non_default, set_publish_non_default, remove_publish_non_default);
    scalar_property!("resourcePrefix": String, resource_prefix, set_resource_prefix, remove_resource_prefix);

    list_property!(
        "flavorDimensions",
        flavor_dimensions,
        add_flavor_dimension,
        remove_flavor_dimension,
        replace_flavor_dimension,
        remove_all_flavor_dimensions
    );

    pub fn default_config(&self) -> ProductFlavorModel {
        ProductFlavorModel::new(self.block.child("defaultConfig"))
    }

    pub fn build_type(&self, name: impl Into<SmolStr>) -> BuildTypeModel {
        BuildTypeModel::new(self.block.child("buildTypes").child(name))
    }

    pub fn build_types(&self, doc: &Document) -> Result<Vec<BuildTypeModel>, DslError> {
        let children = self.block.child("buildTypes").children(doc)?;
        Ok(children.into_iter().map(BuildTypeModel::new).collect())
    }

    pub fn add_build_type(
        &self,
        doc: &mut Document,
        name: impl Into<SmolStr>,
    ) -> Result<BuildTypeModel, DslError> {
        let block = self.block.child("buildTypes").add_block(doc, name)?;
        Ok(BuildTypeModel::new(block))
    }

    pub fn remove_build_type(
        &self,
        doc: &mut Document,
        name: impl Into<SmolStr>,
    ) -> Result<(), DslError> {
        self.block.child("buildTypes").remove_block(doc, name)
    }

    pub fn product_flavor(&self, name: impl Into<SmolStr>) -> ProductFlavorModel {
        ProductFlavorModel::new(self.block.child("productFlavors").child(name))
    }

    pub fn product_flavors(&self, doc: &Document) -> Result<Vec<ProductFlavorModel>, DslError> {
        let children = self.block.child("productFlavors").children(doc)?;
        Ok(children.into_iter().map(ProductFlavorModel::new).collect())
    }

    pub fn add_product_flavor(
        &self,
        doc: &mut Document,
        name: impl Into<SmolStr>,
    ) -> Result<ProductFlavorModel, DslError> {
        let block = self.block.child("productFlavors").add_block(doc, name)?;
        Ok(ProductFlavorModel::new(block))
    }

    pub fn remove_product_flavor(
        &self,
        doc: &mut Document,
        name: impl Into<SmolStr>,
    ) -> Result<(), DslError> {
        self.block.child("productFlavors").remove_block(doc, name)
    }

    pub fn signing_config(&self, name: impl Into<SmolStr>) -> SigningConfigModel {
        SigningConfigModel::new(self.block.child("signingConfigs").child(name))
    }

    pub fn signing_configs(&self, doc: &Document) -> Result<Vec<SigningConfigModel>, DslError> {
        let children = self.block.child("signingConfigs").children(doc)?;
        Ok(children.into_iter().map(SigningConfigModel::new).collect())
    }

    pub fn add_signing_config(
        &self,
        doc: &mut Document,
        name: impl Into<SmolStr>,
    ) -> Result<SigningConfigModel, DslError> {
        let block = self.block.child("signingConfigs").add_block(doc, name)?;
        Ok(SigningConfigModel::new(block))
    }

    pub fn remove_signing_config(
        &self,
        doc: &mut Document,
        name: impl Into<SmolStr>,
    ) -> Result<(), DslError> {
        self.block.child("signingConfigs").remove_block(doc, name)
    }

    pub fn source_set(&self, name: impl Into<SmolStr>) -> SourceSetModel {
        SourceSetModel::new(self.block.child("sourceSets").child(name))
    }

    pub fn source_sets(&self, doc: &Document) -> Result<Vec<SourceSetModel>, DslError> {
        let children = self.block.child("sourceSets").children(doc)?;
        Ok(children.into_iter().map(SourceSetModel::new).collect())
    }

    pub fn add_source_set(
        &self,
        doc: &mut Document,
        name: impl Into<SmolStr>,
    ) -> Result<SourceSetModel, DslError> {
        let block = self.block.child("sourceSets").add_block(doc, name)?;
        Ok(SourceSetModel::new(block))
    }

    pub fn remove_source_set(
        &self,
        doc: &mut Document,
        name: impl Into<SmolStr>,
    ) -> Result<(), DslError> {
        self.block.child("sourceSets").remove_block(doc, name)
    }
}

/// One entry of `android.buildTypes`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTypeModel {
    block: BlockHandle,
}

impl BuildTypeModel {
    pub(crate) fn new(block: BlockHandle) -> Self {
        Self { block }
    }

    pub fn block(&self) -> &BlockHandle {
        &self.block
    }

    pub fn name(&self) -> &str {
        self.block.name().map(SmolStr::as_str).unwrap_or_default()
    }

    scalar_property!("applicationIdSuffix": String, application_id_suffix, set_application_id_suffix, remove_application_id_suffix);
    scalar_property!("debuggable": bool, debuggable, set_debuggable, remove_debuggable);
    scalar_property!("embedMicroApp": bool, embed_micro_app, set_embed_micro_app, remove_embed_micro_app);
    scalar_property!("jniDebuggable": bool, jni_debuggable, set_jni_debuggable, remove_jni_debuggable);
    scalar_property!("minifyEnabled": bool, minify_enabled, set_minify_enabled, remove_minify_enabled);
    scalar_property!("multiDexEnabled": bool, multi_dex_enabled, set_multi_dex_enabled, remove_multi_dex_enabled);
    scalar_property!("pseudoLocalesEnabled": bool, pseudo_locales_enabled, set_pseudo_locales_enabled, remove_pseudo_locales_enabled);
    scalar_property!("renderscriptDebuggable": bool, renderscript_debuggable, set_renderscript_debuggable, remove_renderscript_debuggable);
    scalar_property!("renderscriptOptimLevel": i64, renderscript_optim_level, set_renderscript_optim_level, remove_renderscript_optim_level);
    scalar_property!("shrinkResources": bool, shrink_resources, set_shrink_resources, remove_shrink_resources);
    scalar_property!("testCoverageEnabled": bool, test_coverage_enabled, set_test_coverage_enabled, remove_test_coverage_enabled);
    scalar_property!("useJack": bool, use_jack, set_use_jack, remove_use_jack);
    scalar_property!("versionNameSuffix": String, version_name_suffix, set_version_name_suffix, remove_version_name_suffix);
    scalar_property!("zipAlignEnabled": bool, zip_align_enabled, set_zip_align_enabled, remove_zip_align_enabled);

    list_property!(
        "proguardFiles",
        proguard_files,
        add_proguard_file,
        remove_proguard_file,
        replace_proguard_file,
        remove_all_proguard_files
    );
    list_property!(
        "consumerProguardFiles",
        consumer_proguard_files,
        add_consumer_proguard_file,
        remove_consumer_proguard_file,
        replace_consumer_proguard_file,
        remove_all_consumer_proguard_files
    );

    map_property!(
        "manifestPlaceholders",
        manifest_placeholders,
        set_manifest_placeholder,
        remove_manifest_placeholder,
        remove_all_manifest_placeholders
    );
}

/// `android.defaultConfig` or one entry of `android.productFlavors`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFlavorModel {
    block: BlockHandle,
}

impl ProductFlavorModel {
    pub(crate) fn new(block: BlockHandle) -> Self {
        Self { block }
    }

    pub fn block(&self) -> &BlockHandle {
        &self.block
    }

    pub fn name(&self) -> &str {
        self.block.name().map(SmolStr::as_str).unwrap_or_default()
    }

    scalar_property!("applicationId": String, application_id, set_application_id, remove_application_id);
    scalar_property!("dimension": String, dimension, set_dimension, remove_dimension);
    scalar_property!("maxSdkVersion": i64, max_sdk_version, set_max_sdk_version, remove_max_sdk_version);
    scalar_property!("minSdkVersion": String, min_sdk_version, set_min_sdk_version, remove_min_sdk_version);
    scalar_property!("multiDexEnabled": bool, multi_dex_enabled, set_multi_dex_enabled, remove_multi_dex_enabled);
    scalar_property!("targetSdkVersion": String, target_sdk_version, set_target_sdk_version, remove_target_sdk_version);
    scalar_property!("testApplicationId": String, test_application_id, set_test_application_id, remove_test_application_id);
    scalar_property!("testFunctionalTest": bool, test_functional_test, set_test_functional_test, remove_test_functional_test);
    scalar_property!("testHandleProfiling": bool, test_handle_profiling, set_test_handle_profiling, remove_test_handle_profiling);
    scalar_property!("testInstrumentationRunner": String, test_instrumentation_runner, set_test_instrumentation_runner, remove_test_instrumentation_runner);
    scalar_property!("useJack": bool, use_jack, set_use_jack, remove_use_jack);
    scalar_property!("versionCode": i64, version_code, set_version_code, remove_version_code);
    scalar_property!("versionName": String, version_name, set_version_name, remove_version_name);

    list_property!(
        "consumerProguardFiles",
        consumer_proguard_files,
        add_consumer_proguard_file,
        remove_consumer_proguard_file,
        replace_consumer_proguard_file,
        remove_all_consumer_proguard_files
    );
    list_property!(
        "proguardFiles",
        proguard_files,
        add_proguard_file,
        remove_proguard_file,
        replace_proguard_file,
        remove_all_proguard_files
    );
    list_property!(
        "resConfigs",
        res_configs,
        add_res_config,
        remove_res_config,
        replace_res_config,
        remove_all_res_configs
    );

    map_property!(
        "manifestPlaceholders",
        manifest_placeholders,
        set_manifest_placeholder,
        remove_manifest_placeholder,
        remove_all_manifest_placeholders
    );
    map_property!(
        "testInstrumentationRunnerArguments",
        test_instrumentation_runner_arguments,
        set_test_instrumentation_runner_argument,
        remove_test_instrumentation_runner_argument,
        remove_all_test_instrumentation_runner_arguments
    );
}

/// One entry of `android.signingConfigs`
///
/// `storeFile` is usually a call such as `file("release.keystore")`, so it
/// reads and writes a [`Value`] rather than a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningConfigModel {
    block: BlockHandle,
}

impl SigningConfigModel {
    pub(crate) fn new(block: BlockHandle) -> Self {
        Self { block }
    }

    pub fn block(&self) -> &BlockHandle {
        &self.block
    }

    pub fn name(&self) -> &str {
        self.block.name().map(SmolStr::as_str).unwrap_or_default()
    }

    scalar_property!("keyAlias": String, key_alias, set_key_alias, remove_key_alias);
    scalar_property!("keyPassword": String, key_password, set_key_password, remove_key_password);
    scalar_property!("storeFile": Value, store_file, set_store_file, remove_store_file);
    scalar_property!("storePassword": String, store_password, set_store_password, remove_store_password);
    scalar_property!("storeType": String, store_type, set_store_type, remove_store_type);
}

/// One entry of `android.sourceSets`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSetModel {
    block: BlockHandle,
}

impl SourceSetModel {
    pub(crate) fn new(block: BlockHandle) -> Self {
        Self { block }
    }

    pub fn block(&self) -> &BlockHandle {
        &self.block
    }

    pub fn name(&self) -> &str {
        self.block.name().map(SmolStr::as_str).unwrap_or_default()
    }

    scalar_property!("root": String, root, set_root, remove_root);
}
