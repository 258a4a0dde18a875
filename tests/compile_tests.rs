//! Integration tests for the compilation pipeline
//!
//! These tests require the Slang runtime library to be loadable. They
//! compile against an explicit SPIR-V target so no GPU device is needed.

use pretty_assertions::assert_eq;
use sdl3_slang::{Compiler, Error, ShaderFormat, TargetProfile};
use std::path::PathBuf;

const VERTEX_SHADER: &str = r#"
struct VSOutput {
    float4 position : SV_Position;
};

[shader("vertex")]
VSOutput vertexMain(uint vertexID : SV_VertexID) {
    VSOutput output;
    float2 pos = float2(float((vertexID << 1) & 2), float(vertexID & 2));
    output.position = float4(pos * 2.0 - 1.0, 0.0, 1.0);
    return output;
}
"#;

const SAMPLER_SHADER: &str = r#"
uniform float4 tint;

Texture2D sceneTexture;
SamplerState samplerA;
SamplerState samplerB;

[shader("fragment")]
float4 fragmentMain(float2 uv) : SV_Target {
    float4 a = sceneTexture.Sample(samplerA, uv);
    float4 b = sceneTexture.Sample(samplerB, uv);
    return (a + b) * tint;
}
"#;

const DEFINE_SHADER: &str = r#"
[shader("fragment")]
float4 fragmentMain() : SV_Target {
#ifdef USE_RED
    return float4(1, 0, 0, 1);
#else
    return float4(0, 1, 0, 1);
#endif
}
"#;

const COMPUTE_SHADER: &str = r#"
RWStructuredBuffer<float> results;

[shader("compute")]
[numthreads(8, 4, 1)]
void computeMain(uint3 tid : SV_DispatchThreadID) {
    results[tid.x] = float(tid.x);
}
"#;

fn write_fixture(name: &str, source: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("sdl3_slang_tests");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, source).unwrap();
    path
}

fn spirv() -> TargetProfile {
    TargetProfile::new(ShaderFormat::Spirv)
}

#[test]
fn test_compile_simple_shader() {
    let path = write_fixture("simple_vertex.slang", VERTEX_SHADER);
    let compiler = Compiler::new().unwrap();

    let compiled = compiler
        .shader(path.to_str().unwrap(), "vertexMain")
        .compile(&spirv())
        .unwrap();

    assert!(!compiled.code.is_empty(), "Code blob should not be empty");
    assert_eq!(compiled.format, ShaderFormat::Spirv);
    assert_eq!(compiled.entry_point, "vertexMain");
    assert_eq!(compiled.thread_group_size, [0, 0, 0]);
}

#[test]
fn test_resource_counts() {
    let path = write_fixture("sampler_fragment.slang", SAMPLER_SHADER);
    let compiler = Compiler::new().unwrap();

    let compiled = compiler
        .shader(path.to_str().unwrap(), "fragmentMain")
        .compile(&spirv())
        .unwrap();

    let resources = compiled.resources;
    assert_eq!(resources.samplers, 2);
    assert_eq!(resources.uniform_buffers, 1);
    assert_eq!(resources.storage_buffers(), 0);
    assert_eq!(resources.storage_textures(), 0);
    // Four global parameters; the plain texture is not a storage category
    // and stays unclassified.
    assert!(resources.total() <= 4);
}

#[test]
fn test_missing_entry_point() {
    let path = write_fixture("missing_entry.slang", VERTEX_SHADER);
    let compiler = Compiler::new().unwrap();

    let result = compiler
        .shader(path.to_str().unwrap(), "doesNotExist")
        .compile(&spirv());

    match result {
        Err(Error::EntryPointNotFound { name, .. }) => assert_eq!(name, "doesNotExist"),
        other => panic!("Expected EntryPointNotFound, got {other:?}"),
    }
}

#[test]
fn test_missing_module() {
    let compiler = Compiler::new().unwrap();

    let result = compiler
        .shader("does/not/exist.slang", "vertexMain")
        .compile(&spirv());

    assert!(matches!(result, Err(Error::ModuleLoad { .. })));
}

#[test]
fn test_compile_with_defines() {
    let path = write_fixture("define_fragment.slang", DEFINE_SHADER);
    let compiler = Compiler::new().unwrap();

    let plain = compiler
        .shader(path.to_str().unwrap(), "fragmentMain")
        .compile(&spirv())
        .unwrap();
    let red = compiler
        .shader(path.to_str().unwrap(), "fragmentMain")
        .define("USE_RED", "1")
        .compile(&spirv())
        .unwrap();

    assert!(!plain.code.is_empty());
    assert!(!red.code.is_empty());
    assert_ne!(
        plain.code, red.code,
        "Define should change conditional compilation output"
    );
}

#[test]
fn test_compute_thread_group_size() {
    let path = write_fixture("simple_compute.slang", COMPUTE_SHADER);
    let compiler = Compiler::new().unwrap();

    let compiled = compiler
        .shader(path.to_str().unwrap(), "computeMain")
        .compile(&spirv())
        .unwrap();

    assert!(!compiled.code.is_empty());
    assert_eq!(compiled.thread_group_size, [8, 4, 1]);
}

#[test]
fn test_independent_compilers() {
    // Sessions are scoped values; creating and dropping several must be safe.
    let first = Compiler::new().unwrap();
    let second = Compiler::new().unwrap();
    drop(first);

    let path = write_fixture("post_drop_vertex.slang", VERTEX_SHADER);
    let compiled = second
        .shader(path.to_str().unwrap(), "vertexMain")
        .compile(&spirv())
        .unwrap();
    assert!(!compiled.code.is_empty());
    drop(second);
}
