/// WGSL shader for lit, shadowed instances (boxes and spheres).
pub const SCENE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    light_view_proj: mat4x4<f32>,
    // xyz: eye position
    eye: vec4<f32>,
    // xyz: direction towards the light, w: intensity
    light_dir: vec4<f32>,
    // rgb: light colour, w: 1 when the shadow map is valid
    light_color: vec4<f32>,
    ambient: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;
@group(0) @binding(1)
var shadow_map: texture_depth_2d;
@group(0) @binding(2)
var shadow_sampler: sampler_comparison;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    // rgb: base colour, a: 1 when the instance receives shadows
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) shadow_pos: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.color = instance.color;
    out.shadow_pos = uniforms.light_view_proj * world_pos;
    return out;
}

fn shadow_factor(shadow_pos: vec4<f32>) -> f32 {
    let p = shadow_pos.xyz / shadow_pos.w;
    let uv = p.xy * vec2<f32>(0.5, -0.5) + vec2<f32>(0.5, 0.5);
    let lit = textureSampleCompareLevel(shadow_map, shadow_sampler, uv, p.z - 0.0015);
    let inside = all(uv >= vec2<f32>(0.0)) && all(uv <= vec2<f32>(1.0)) && p.z <= 1.0;
    return select(1.0, lit, inside);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let l = normalize(uniforms.light_dir.xyz);
    let base = pow(in.color.rgb, vec3<f32>(2.2));

    let shadow_sample = shadow_factor(in.shadow_pos);
    let receives = uniforms.light_color.w > 0.5 && in.color.a > 0.5;
    let shadow = select(1.0, shadow_sample, receives);

    let light = uniforms.light_color.rgb * uniforms.light_dir.w;
    let diffuse = max(dot(n, l), 0.0);
    let view_dir = normalize(uniforms.eye.xyz - in.world_pos);
    let half_dir = normalize(l + view_dir);
    let specular = pow(max(dot(n, half_dir), 0.0), 30.0) * 0.067;

    let rgb = base * (uniforms.ambient.rgb + light * diffuse * shadow)
        + light * specular * shadow;
    return vec4<f32>(rgb, 1.0);
}
"#;

/// WGSL depth-only shader rendering shadow casters from the light.
pub const SHADOW_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    light_view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
    ambient: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

@vertex
fn vs_shadow(vertex: VertexInput, instance: InstanceInput) -> @builtin(position) vec4<f32> {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    return uniforms.light_view_proj * model * vec4<f32>(vertex.position, 1.0);
}
"#;
