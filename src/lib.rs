// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
pub mod error;
pub mod symbolic;
pub mod numerical;
pub mod plotting;
pub mod Utils;
pub mod visualizer;
