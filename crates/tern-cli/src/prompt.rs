pub mod rustyline;
