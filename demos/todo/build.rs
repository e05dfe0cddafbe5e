fn main() {
    if let Err(err) = strata_build::Builder::new()
        .source("src/models.rs")
        .generate()
    {
        panic!("strata code generation failed:\n{err}");
    }
}
