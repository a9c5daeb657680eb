mod compile_queries;
mod test_utils;
