/// loading mechanism documents and thermo libraries from files
pub mod load_from_file;
