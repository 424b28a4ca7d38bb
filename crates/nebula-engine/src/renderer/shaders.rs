//! WGSL sources for the particle and trail passes.
//!
//! The host compiles these once at startup. Both passes share the uniform block,
//! the noise field and the displacement function, so a particle and its trail
//! are displaced identically.
//!
//! Vertex layout (instanced, 6 vertices per particle quad):
//! - `@location(0)` position, vec3, from the live or trail position buffer
//! - `@location(1..=4)` color, size, brightness, seed from the static buffer
//! - `@location(5)` trail alpha (trail pass only)

/// Uniform block; must match `ParticleUniforms`.
const UNIFORMS: &str = r#"
struct ParticleUniforms {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    time: f32,
    tension: f32,
    explosion: f32,
    pulse_radius: f32,
    pulse_strength: f32,
    pulse_width: f32,
    point_size: f32,
    pixel_ratio: f32,
    tint: vec4<f32>,
    viewport: vec2<f32>,
    padding: vec2<f32>,
}

@group(0) @binding(0) var<uniform> frame: ParticleUniforms;

struct VertexOutput {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
}
"#;

/// 3D simplex noise in [-1, 1] (Ashima Arts / Stefan Gustavson).
const NOISE: &str = r#"
fn mod289_3(x: vec3<f32>) -> vec3<f32> {
    return x - floor(x * (1.0 / 289.0)) * 289.0;
}

fn mod289_4(x: vec4<f32>) -> vec4<f32> {
    return x - floor(x * (1.0 / 289.0)) * 289.0;
}

fn permute4(x: vec4<f32>) -> vec4<f32> {
    return mod289_4(((x * 34.0) + 10.0) * x);
}

fn taylor_inv_sqrt4(r: vec4<f32>) -> vec4<f32> {
    return 1.79284291400159 - 0.85373472095314 * r;
}

fn noise3(v: vec3<f32>) -> f32 {
    let c = vec2<f32>(1.0 / 6.0, 1.0 / 3.0);
    let d = vec4<f32>(0.0, 0.5, 1.0, 2.0);

    var i = floor(v + dot(v, c.yyy));
    let x0 = v - i + dot(i, c.xxx);

    let g = step(x0.yzx, x0.xyz);
    let l = 1.0 - g;
    let i1 = min(g.xyz, l.zxy);
    let i2 = max(g.xyz, l.zxy);

    let x1 = x0 - i1 + c.xxx;
    let x2 = x0 - i2 + c.yyy;
    let x3 = x0 - d.yyy;

    i = mod289_3(i);
    let p = permute4(permute4(permute4(
        i.z + vec4<f32>(0.0, i1.z, i2.z, 1.0))
        + i.y + vec4<f32>(0.0, i1.y, i2.y, 1.0))
        + i.x + vec4<f32>(0.0, i1.x, i2.x, 1.0));

    let n7 = 0.142857142857;
    let ns = n7 * d.wyz - d.xzx;

    let j = p - 49.0 * floor(p * ns.z * ns.z);
    let gx = floor(j * ns.z);
    let gy = floor(j - 7.0 * gx);

    let x = gx * ns.x + ns.yyyy;
    let y = gy * ns.x + ns.yyyy;
    let h = 1.0 - abs(x) - abs(y);

    let b0 = vec4<f32>(x.xy, y.xy);
    let b1 = vec4<f32>(x.zw, y.zw);

    let s0 = floor(b0) * 2.0 + 1.0;
    let s1 = floor(b1) * 2.0 + 1.0;
    let sh = -step(h, vec4<f32>(0.0));

    let a0 = b0.xzyw + s0.xzyw * sh.xxyy;
    let a1 = b1.xzyw + s1.xzyw * sh.zzww;

    var g0 = vec3<f32>(a0.xy, h.x);
    var g1 = vec3<f32>(a0.zw, h.y);
    var g2 = vec3<f32>(a1.xy, h.z);
    var g3 = vec3<f32>(a1.zw, h.w);

    let norm = taylor_inv_sqrt4(vec4<f32>(dot(g0, g0), dot(g1, g1), dot(g2, g2), dot(g3, g3)));
    g0 = g0 * norm.x;
    g1 = g1 * norm.y;
    g2 = g2 * norm.z;
    g3 = g3 * norm.w;

    var m = max(0.5 - vec4<f32>(dot(x0, x0), dot(x1, x1), dot(x2, x2), dot(x3, x3)), vec4<f32>(0.0));
    m = m * m;
    return 105.0 * dot(m * m, vec4<f32>(dot(g0, x0), dot(g1, x1), dot(g2, x2), dot(g3, x3)));
}
"#;

/// Quad corners, pulse band and the shared displacement.
const COMMON: &str = r#"
fn quad_corner(index: u32) -> vec2<f32> {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
    );
    return corners[index % 6u];
}

fn pulse_band(radial: f32, radius: f32, width: f32) -> f32 {
    return smoothstep(radius - width, radius, radial)
        * (1.0 - smoothstep(radius, radius + width, radial));
}

fn displace(position: vec3<f32>, seed: f32) -> vec3<f32> {
    let phase = seed * 6.2831853;
    let wobble = vec3<f32>(
        sin(frame.time * 0.9 + phase),
        cos(frame.time * 0.7 + phase * 1.3),
        sin(frame.time * 0.8 + phase * 0.7),
    ) * 0.06;

    var p = position * (1.0 - 0.35 * frame.tension) + wobble;

    let turbulence = 0.05 + 0.4 * frame.tension;
    let q = p * 0.35;
    let drift = vec3<f32>(
        noise3(q + vec3<f32>(frame.time * 0.2, 0.0, 0.0)),
        noise3(q + vec3<f32>(0.0, frame.time * 0.2, 17.0)),
        noise3(q + vec3<f32>(31.0, 0.0, frame.time * 0.2)),
    );
    p = p + drift * turbulence;

    let dist = length(p);
    if (frame.pulse_strength > 0.0 && dist > 0.0001) {
        let band = pulse_band(dist, frame.pulse_radius, frame.pulse_width);
        p = p + (p / dist) * band * frame.pulse_strength;
    }
    return p;
}

fn view_depth(world: vec3<f32>) -> f32 {
    let view_pos = frame.view * vec4<f32>(world, 1.0);
    return max(-view_pos.z, 0.1);
}

fn billboard(world: vec3<f32>, corner: vec2<f32>, size_px: f32) -> vec4<f32> {
    let clip = frame.view_proj * vec4<f32>(world, 1.0);
    let offset = corner * size_px / max(frame.viewport, vec2<f32>(1.0));
    return clip + vec4<f32>(offset * clip.w, 0.0, 0.0);
}

fn depth_fade(depth: f32) -> f32 {
    return clamp(1.4 - depth / 40.0, 0.25, 1.0);
}

fn soft_disc(uv: vec2<f32>, color: vec4<f32>) -> vec4<f32> {
    let falloff = 1.0 - smoothstep(0.0, 1.0, length(uv));
    let alpha = color.a * falloff * falloff;
    if (alpha < 0.02) {
        discard;
    }
    return vec4<f32>(color.rgb * alpha, alpha);
}
"#;

const PARTICLE_STAGES: &str = r#"
struct ParticleInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
    @location(2) size: f32,
    @location(3) brightness: f32,
    @location(4) seed: f32,
}

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32, particle: ParticleInput) -> VertexOutput {
    var result: VertexOutput;
    let world = displace(particle.position, particle.seed);
    let depth = view_depth(world);

    let boost = 1.0 + frame.explosion * 1.5;
    let size_px = particle.size * frame.point_size * frame.pixel_ratio * boost / depth;
    let corner = quad_corner(vertex_index);
    result.clip = billboard(world, corner, size_px);
    result.uv = corner;

    let twinkle = 0.75 + 0.25 * sin(frame.time * (1.5 + particle.seed * 3.0) + particle.seed * 40.0);
    let tinted = particle.color * frame.tint.rgb;
    let hot = mix(tinted, vec3<f32>(1.0, 0.95, 0.9), frame.explosion * 0.6);
    let alpha = clamp(particle.brightness * twinkle * depth_fade(depth) * (1.0 + frame.explosion), 0.0, 1.0);
    result.color = vec4<f32>(hot * particle.brightness, alpha);
    return result;
}

@fragment
fn fs_main(fragment: VertexOutput) -> @location(0) vec4<f32> {
    return soft_disc(fragment.uv, fragment.color);
}
"#;

const TRAIL_STAGES: &str = r#"
struct TrailInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
    @location(2) size: f32,
    @location(3) brightness: f32,
    @location(4) seed: f32,
    @location(5) alpha: f32,
}

@vertex
fn vs_trail(@builtin(vertex_index) vertex_index: u32, particle: TrailInput) -> VertexOutput {
    var result: VertexOutput;
    let world = displace(particle.position, particle.seed);
    let depth = view_depth(world);

    let size_px = particle.size * frame.point_size * frame.pixel_ratio * 0.7 / depth;
    let corner = quad_corner(vertex_index);
    result.clip = billboard(world, corner, size_px);
    result.uv = corner;

    let tinted = particle.color * frame.tint.rgb;
    let alpha = clamp(particle.alpha * particle.brightness * depth_fade(depth) * 0.6, 0.0, 1.0);
    result.color = vec4<f32>(tinted, alpha);
    return result;
}

@fragment
fn fs_trail(fragment: VertexOutput) -> @location(0) vec4<f32> {
    return soft_disc(fragment.uv, fragment.color);
}
"#;

pub const PARTICLE_VERTEX_ENTRY: &str = "vs_main";
pub const PARTICLE_FRAGMENT_ENTRY: &str = "fs_main";
pub const TRAIL_VERTEX_ENTRY: &str = "vs_trail";
pub const TRAIL_FRAGMENT_ENTRY: &str = "fs_trail";

/// Main particle pass, drawn with alpha blending over the trails.
pub fn particle_shader() -> String {
    [UNIFORMS, NOISE, COMMON, PARTICLE_STAGES].concat()
}

/// Trail pass, drawn additively before the particles.
pub fn trail_shader() -> String {
    [UNIFORMS, NOISE, COMMON, TRAIL_STAGES].concat()
}
