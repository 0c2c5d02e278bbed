mod service_tests;
mod signer_tests;
