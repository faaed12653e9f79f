// Pipeline — the embed → similarity → sweep batch run.

pub mod dedup;
