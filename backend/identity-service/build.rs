// Build script for identity-service
// Compiles auth_service.proto for gRPC server and client code generation
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=../proto/services/auth_service.proto");

    // Use the vendored protoc so builds do not depend on a system install
    std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);

    // identity-service PROVIDES AuthService (server implementation)
    // Client code is generated for the order client and integration tests
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["../proto/services/auth_service.proto"], &["../proto/services"])?;

    Ok(())
}
