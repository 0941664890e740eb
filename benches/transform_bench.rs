//! Transform benchmarks.
//!
//! Measures end-to-end throughput (bytes/sec) for the common feature sets.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use zest::{SourceFile, SourceMapOptions, Transform, TransformOptions, transform, transform_batch};

// =============================================================================
// Test Sources
// =============================================================================

const TYPESCRIPT_SOURCE: &str = r#"
import type {User} from './types';
import {fetchJson} from './http';

export interface Page<T> {
    items: T[];
    next?: string;
}

export class UserService {
    private cache = new Map<number, User>();

    constructor(private readonly baseUrl: string) {}

    async get(id: number): Promise<User | undefined> {
        const cached = this.cache.get(id);
        if (cached) return cached;
        const user = await fetchJson<User>(`${this.baseUrl}/users/${id}`);
        this.cache.set(id, user);
        return user?.profile?.name ? user : undefined;
    }
}

export enum Role {
    Admin,
    Member = 10,
}
"#;

const JSX_SOURCE: &str = r#"
import React, {useState} from 'react';

export default function Counter({initial}) {
    const [count, setCount] = useState(initial ?? 0);
    return (
        <div className="counter">
            <button onClick={() => setCount(count - 1)}>-</button>
            <span>{count}</span>
            <button onClick={() => setCount(count + 1)}>+</button>
        </div>
    );
}
"#;

/// Generate a large TypeScript module for throughput testing
fn generate_large_source(functions: usize, statements_per_fn: usize) -> String {
    let mut source = String::with_capacity(functions * statements_per_fn * 80);
    source.push_str("import {log} from './log';\n\n");
    for f in 0..functions {
        source.push_str(&format!("export function fn{f}(x: number, y?: number): number {{\n"));
        for s in 0..statements_per_fn {
            source.push_str(&format!("    let v{s}: number = x + (y ?? {s});\n"));
        }
        source.push_str("    log(x);\n    return x;\n}\n\n");
    }
    source
}

// =============================================================================
// Transform Benchmarks
// =============================================================================

fn bench_typescript_imports(c: &mut Criterion) {
    let options = TransformOptions::new(&[Transform::Typescript, Transform::Imports]);
    c.bench_function("typescript_imports", |b| {
        b.iter(|| black_box(transform(TYPESCRIPT_SOURCE, &options)))
    });
}

fn bench_jsx_imports(c: &mut Criterion) {
    let options = TransformOptions::new(&[Transform::Jsx, Transform::Imports]);
    c.bench_function("jsx_imports", |b| b.iter(|| black_box(transform(JSX_SOURCE, &options))));
}

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform_throughput");
    let options = TransformOptions::new(&[Transform::Typescript, Transform::Imports]);

    for (functions, statements) in [(10, 5), (50, 5), (100, 10)] {
        let source = generate_large_source(functions, statements);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("transform", format!("{functions}fn_{statements}stmt")),
            &source,
            |b, source| b.iter(|| black_box(transform(source, &options))),
        );
    }

    group.finish();
}

/// Source map generation overhead
fn bench_with_source_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform_source_map");
    let source = generate_large_source(50, 10);
    group.throughput(Throughput::Bytes(source.len() as u64));

    let plain = TransformOptions::new(&[Transform::Typescript]);
    let mut mapped = plain.clone();
    mapped.source_map_options = Some(SourceMapOptions {
        compiled_filename: "bench.js".to_string(),
    });

    group.bench_function("without_source_map", |b| b.iter(|| black_box(transform(&source, &plain))));
    group.bench_function("with_source_map", |b| b.iter(|| black_box(transform(&source, &mapped))));
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let files: Vec<SourceFile> = (0..64)
        .map(|i| SourceFile::new(format!("src/module{i}.ts"), generate_large_source(10, 5)))
        .collect();
    let options = TransformOptions::new(&[Transform::Typescript, Transform::Imports]);
    c.bench_function("batch_64_files", |b| b.iter(|| black_box(transform_batch(&files, &options))));
}

criterion_group!(
    benches,
    bench_typescript_imports,
    bench_jsx_imports,
    bench_throughput,
    bench_with_source_map,
    bench_batch,
);

criterion_main!(benches);
