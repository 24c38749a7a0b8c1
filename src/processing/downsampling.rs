/// Largest-Triangle-Three-Buckets over `[x, y]` points sorted by x.
/// The first and last points are always kept.
pub fn lttb(points: &[[f64; 2]], target: usize) -> Vec<[f64; 2]> {
    let n = points.len();
    if n <= target || target < 3 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(target);
    out.push(points[0]);

    let bucket_size = (n - 2) as f64 / (target - 2) as f64;
    let mut prev = points[0];

    for i in 0..(target - 2) {
        let start = ((i as f64 * bucket_size) as usize + 1).min(n - 1);
        let end = (((i + 1) as f64 * bucket_size) as usize + 1).min(n - 1);
        let next_start = end;
        let next_end = (((i + 2) as f64 * bucket_size) as usize + 1).min(n);

        let next = &points[next_start..next_end.max(next_start + 1).min(n)];
        let count = next.len().max(1) as f64;
        let avg_x = next.iter().map(|p| p[0]).sum::<f64>() / count;
        let avg_y = next.iter().map(|p| p[1]).sum::<f64>() / count;

        let mut best = points[start];
        let mut max_area = -1.0f64;
        for &p in &points[start..end.max(start + 1)] {
            // Doubled triangle area; only compared.
            let area = ((prev[0] - avg_x) * (p[1] - prev[1])
                - (prev[0] - p[0]) * (avg_y - prev[1]))
                .abs();
            if area > max_area {
                max_area = area;
                best = p;
            }
        }
        out.push(best);
        prev = best;
    }

    out.push(points[n - 1]);
    out
}

/// Points to draw for the visible x range. Non-finite points are dropped and
/// anything above `max_points` is thinned with [`lttb`]. Drawing only: hover
/// lookup always works on the full series.
pub fn thin_for_view(
    points: &[[f64; 2]],
    x_min: f64,
    x_max: f64,
    max_points: usize,
) -> Vec<[f64; 2]> {
    let finite = |p: &[f64; 2]| p[0].is_finite() && p[1].is_finite();

    // Concatenated runs are not globally sorted; binary search only when they are.
    let visible: Vec<[f64; 2]> = if points.windows(2).all(|w| w[0][0] <= w[1][0]) {
        let start = points.partition_point(|p| p[0] < x_min).saturating_sub(1);
        let end = (points.partition_point(|p| p[0] <= x_max) + 1).min(points.len());
        if start >= end {
            return Vec::new();
        }
        points[start..end].iter().copied().filter(finite).collect()
    } else {
        points
            .iter()
            .copied()
            .filter(|p| finite(p) && p[0] >= x_min && p[0] <= x_max)
            .collect()
    };
    lttb(&visible, max_points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<[f64; 2]> {
        (0..n).map(|i| [i as f64, (i as f64).sin()]).collect()
    }

    #[test]
    fn small_input_is_untouched() {
        let pts = ramp(5);
        assert_eq!(lttb(&pts, 10), pts);
    }

    #[test]
    fn lttb_hits_target_and_keeps_ends() {
        let pts = ramp(1_000);
        let out = lttb(&pts, 100);
        assert_eq!(out.len(), 100);
        assert_eq!(out[0], pts[0]);
        assert_eq!(out[99], pts[999]);
        assert!(out.windows(2).all(|w| w[0][0] < w[1][0]));
    }

    #[test]
    fn view_clips_to_range_with_margin() {
        let pts = ramp(100);
        let out = thin_for_view(&pts, 10.0, 20.0, 1_000);
        assert_eq!(out.first().map(|p| p[0]), Some(9.0));
        assert_eq!(out.last().map(|p| p[0]), Some(21.0));
    }

    #[test]
    fn unsorted_points_are_filtered_linearly() {
        let pts = vec![[5.0, 0.0], [1.0, 0.0], [3.0, 0.0], [9.0, 0.0]];
        assert_eq!(thin_for_view(&pts, 2.0, 6.0, 10), vec![[5.0, 0.0], [3.0, 0.0]]);
    }

    #[test]
    fn nan_points_are_not_drawn() {
        let pts = vec![[0.0, 1.0], [1.0, f64::NAN], [2.0, 3.0]];
        assert_eq!(thin_for_view(&pts, 0.0, 2.0, 10).len(), 2);
    }
}
