pub mod cross_filter;
pub mod downsampling;
pub mod kd_tree;
pub mod phase_filter;
pub mod projection;
