//! Reverie: CLAP stereo reverb.
//!
//! Builds the `.clap` binary: `cargo build -p reverie-clap --example reverie --release`.

clack_plugin::clack_export_entry!(
    clack_plugin::prelude::SinglePluginEntry<reverie_clap::ReverbPlugin>
);
