//! Common test utilities for vfb-connect integration tests
//!
//! This module provides a small fan-shaped-body/LC12 knowledge base served by
//! an in-memory backend, plus helpers for opening sessions over it.

#![allow(dead_code, unused_imports)]

pub mod kb;

pub use kb::{
    class_doc, connect, connect_with, core, individual_doc, knowledge_base, CELL, DATASET, FB,
    FB_LAYER_1, FB_LAYER_2, FB_PAINTED, LC12, LC12_R, LC12_R_2, LC12_R_3, NEUPRINT, NEURON,
    TEMPLATE,
};
