fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::configure().compile_protos(&["proto/broker/v1/broker.proto"], &["proto"])?;
    Ok(())
}
