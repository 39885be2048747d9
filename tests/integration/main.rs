mod cli_test;
mod cluster_test;
