mod extension_test;
mod init_test;
