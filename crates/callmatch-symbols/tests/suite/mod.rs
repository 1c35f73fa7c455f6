mod constants;
mod source_loading;
