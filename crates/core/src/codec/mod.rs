pub mod url_params;
