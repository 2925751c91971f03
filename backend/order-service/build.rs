// Build script for order-service
// Compiles order_service.proto for gRPC server and client code generation
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=../proto/services/order_service.proto");

    std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);

    // order-service PROVIDES ProductInfo and OrderManagement
    // Client code is used by the order-client binary and integration tests
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["../proto/services/order_service.proto"], &["../proto/services"])?;

    Ok(())
}
