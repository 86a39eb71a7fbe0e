mod tests_android_model;
mod tests_blocks;
mod tests_lifecycle;
mod tests_plugins;
mod tests_resolution;
mod tests_round_trip;
mod tests_signing_and_source_sets;
