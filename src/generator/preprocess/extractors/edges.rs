//! Edge detection and contour approximation over grayscale buffers

use image::GrayImage;
use std::collections::VecDeque;

/// tan(22.5°) and tan(67.5°), the gradient direction sector bounds
const TAN_22_5: f32 = 0.414_213_57;
const TAN_67_5: f32 = 2.414_213_6;

/// Binary edge mask in row-major order
#[derive(Debug, Clone)]
pub struct EdgeMap {
    pub width: usize,
    pub height: usize,
    pub edges: Vec<bool>,
}

impl EdgeMap {
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| **e).count()
    }

    /// Fraction of pixels that are edges
    pub fn density(&self) -> f64 {
        if self.edges.is_empty() {
            0.0
        } else {
            self.edge_count() as f64 / self.edges.len() as f64
        }
    }

    fn is_edge(&self, x: usize, y: usize) -> bool {
        self.edges[y * self.width + x]
    }
}

/// Canny edge detector: 3x3 Sobel gradients with L1 magnitude, non-maximum suppression and
/// hysteresis between `low` and `high`.
pub fn canny(gray: &GrayImage, low: f32, high: f32) -> EdgeMap {
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    let mut edges = vec![false; width * height];
    if width < 3 || height < 3 {
        return EdgeMap {
            width,
            height,
            edges,
        };
    }

    let px = |x: usize, y: usize| gray.get_pixel(x as u32, y as u32)[0] as f32;
    let mut gx = vec![0f32; width * height];
    let mut gy = vec![0f32; width * height];
    let mut magnitude = vec![0f32; width * height];

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let dx = (px(x + 1, y - 1) + 2.0 * px(x + 1, y) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2.0 * px(x - 1, y) + px(x - 1, y + 1));
            let dy = (px(x - 1, y + 1) + 2.0 * px(x, y + 1) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2.0 * px(x, y - 1) + px(x + 1, y - 1));
            let i = y * width + x;
            gx[i] = dx;
            gy[i] = dy;
            magnitude[i] = dx.abs() + dy.abs();
        }
    }

    // Non-maximum suppression
    let mut suppressed = vec![0f32; width * height];
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let i = y * width + x;
            let m = magnitude[i];
            if m <= low {
                continue;
            }
            let (ax, ay) = (gx[i].abs(), gy[i].abs());
            let (a, b) = if ay <= ax * TAN_22_5 {
                (magnitude[i - 1], magnitude[i + 1])
            } else if ay >= ax * TAN_67_5 {
                (magnitude[i - width], magnitude[i + width])
            } else if gx[i] * gy[i] > 0.0 {
                (magnitude[i - width - 1], magnitude[i + width + 1])
            } else {
                (magnitude[i - width + 1], magnitude[i + width - 1])
            };
            if m > a && m >= b {
                suppressed[i] = m;
            }
        }
    }

    // Hysteresis from strong pixels through weak neighbours
    let mut queue: VecDeque<usize> = VecDeque::new();
    for (i, &m) in suppressed.iter().enumerate() {
        if m > high {
            edges[i] = true;
            queue.push_back(i);
        }
    }
    while let Some(i) = queue.pop_front() {
        let (x, y) = (i % width, i / width);
        for (nx, ny) in neighbours(x, y, width, height) {
            let j = ny * width + nx;
            if !edges[j] && suppressed[j] > low {
                edges[j] = true;
                queue.push_back(j);
            }
        }
    }

    EdgeMap {
        width,
        height,
        edges,
    }
}

/// 8-connected components of the edge mask, largest first
pub fn connected_components(map: &EdgeMap) -> Vec<Vec<(i64, i64)>> {
    let mut visited = vec![false; map.edges.len()];
    let mut components = Vec::new();

    for y in 0..map.height {
        for x in 0..map.width {
            let start = y * map.width + x;
            if visited[start] || !map.is_edge(x, y) {
                continue;
            }
            visited[start] = true;
            let mut queue = VecDeque::from([(x, y)]);
            let mut component = Vec::new();
            while let Some((cx, cy)) = queue.pop_front() {
                component.push((cx as i64, cy as i64));
                for (nx, ny) in neighbours(cx, cy, map.width, map.height) {
                    let j = ny * map.width + nx;
                    if !visited[j] && map.edges[j] {
                        visited[j] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
            components.push(component);
        }
    }

    components.sort_by_key(|c| std::cmp::Reverse(c.len()));
    components
}

fn neighbours(x: usize, y: usize, width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
    let (x, y) = (x as i64, y as i64);
    (-1i64..=1)
        .flat_map(move |dy| (-1i64..=1).map(move |dx| (x + dx, y + dy)))
        .filter(move |&(nx, ny)| {
            (nx, ny) != (x, y) && nx >= 0 && ny >= 0 && nx < width as i64 && ny < height as i64
        })
        .map(|(nx, ny)| (nx as usize, ny as usize))
}

/// Counter-clockwise convex hull (Andrew's monotone chain)
pub fn convex_hull(points: &[(i64, i64)]) -> Vec<(i64, i64)> {
    let mut sorted = points.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    let cross = |o: (i64, i64), a: (i64, i64), b: (i64, i64)| {
        (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
    };

    let mut hull: Vec<(i64, i64)> = Vec::with_capacity(sorted.len() * 2);
    for &p in &sorted {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Perimeter of a closed polygon
pub fn perimeter(polygon: &[(i64, i64)]) -> f64 {
    if polygon.len() < 2 {
        return 0.0;
    }
    polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(a, b)| distance(*a, *b))
        .sum()
}

/// Douglas-Peucker simplification of a closed polygon; returns the kept vertex count
pub fn approximate_vertex_count(polygon: &[(i64, i64)], epsilon: f64) -> usize {
    if polygon.len() <= 3 {
        return polygon.len();
    }

    // Split the ring at the vertex farthest from the first one
    let first = polygon[0];
    let split = (1..polygon.len())
        .max_by(|&a, &b| {
            distance(first, polygon[a]).total_cmp(&distance(first, polygon[b]))
        })
        .unwrap_or(polygon.len() / 2);

    let mut ring = polygon.to_vec();
    ring.push(first);
    let head = simplify(&ring[..=split], epsilon);
    let tail = simplify(&ring[split..], epsilon);
    // Both chains share their endpoints
    head + tail - 2
}

fn simplify(chain: &[(i64, i64)], epsilon: f64) -> usize {
    if chain.len() < 3 {
        return chain.len();
    }
    let (start, end) = (chain[0], chain[chain.len() - 1]);
    let (index, max_distance) = chain[1..chain.len() - 1]
        .iter()
        .enumerate()
        .map(|(i, p)| (i + 1, segment_distance(*p, start, end)))
        .fold((0, 0.0f64), |best, candidate| {
            if candidate.1 > best.1 { candidate } else { best }
        });

    if max_distance > epsilon && index > 0 {
        simplify(&chain[..=index], epsilon) + simplify(&chain[index..], epsilon) - 1
    } else {
        2
    }
}

fn distance(a: (i64, i64), b: (i64, i64)) -> f64 {
    (((a.0 - b.0).pow(2) + (a.1 - b.1).pow(2)) as f64).sqrt()
}

fn segment_distance(p: (i64, i64), a: (i64, i64), b: (i64, i64)) -> f64 {
    let length = distance(a, b);
    if length == 0.0 {
        return distance(p, a);
    }
    let cross = (b.0 - a.0) * (a.1 - p.1) - (a.0 - p.0) * (b.1 - a.1);
    cross.abs() as f64 / length
}
