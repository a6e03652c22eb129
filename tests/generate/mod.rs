mod tests_config;
mod tests_generate;
mod tests_output;
