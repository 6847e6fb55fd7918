// The custom build script, needed for the `built` build information.

fn main() -> Result<(), anyhow::Error> {
    built::write_built_file()
        .map_err(|e| anyhow::anyhow!("failed to acquire build-time information: {}", e))?;
    Ok(())
}
