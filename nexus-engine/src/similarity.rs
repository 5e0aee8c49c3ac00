/// Similarité cosinus, avec poids optionnels répétés cycliquement (un poids par feature).
/// Vaut exactement 0 si l'un des vecteurs (pondérés) est nul.
pub fn cosine(a: &[f64], b: &[f64], weights: Option<&[f64]>) -> f64 {
    let weight_at = |k: usize| match weights {
        Some(w) if !w.is_empty() => w[k % w.len()],
        _ => 1.0,
    };

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (k, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let w = weight_at(k);
        let (x, y) = (x * w, y * w);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Décroissance linéaire : `1 - (offset / len) * strength`.
pub fn time_decay(offset: usize, len: usize, strength: f64) -> f64 {
    if len == 0 {
        return 1.0;
    }
    1.0 - (offset as f64 / len as f64) * strength
}

#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    weights: Vec<f64>,
    decay_strength: f64,
}

impl SimilarityScorer {
    pub fn new(weights: Vec<f64>, decay_strength: f64) -> Self {
        Self { weights, decay_strength }
    }

    pub fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        cosine(a, b, Some(&self.weights))
    }

    /// Similarité pondérée puis atténuée selon l'ancienneté de l'offset.
    pub fn score(&self, current: &[f64], past: &[f64], offset: usize, history_len: usize) -> f64 {
        self.similarity(current, past) * time_decay(offset, history_len, self.decay_strength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_self_similarity() {
        let v = vec![0.3, 0.7, 0.5, 0.2, 0.9, 0.1];
        assert!((cosine(&v, &v, None) - 1.0).abs() < EPS);
        assert!((cosine(&v, &v, Some(&[1.0, 1.5, 0.5])) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_zero_vector() {
        let v = vec![0.3, 0.7, 0.5];
        let zero = vec![0.0; 3];
        assert_eq!(cosine(&v, &zero, None), 0.0);
        assert_eq!(cosine(&zero, &v, None), 0.0);
        assert_eq!(cosine(&zero, &zero, Some(&[1.0, 2.0, 3.0])), 0.0);
    }

    #[test]
    fn test_zero_weights_degenerate() {
        let v = vec![0.3, 0.7];
        assert_eq!(cosine(&v, &v, Some(&[0.0])), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let a = vec![0.1, 0.9, 0.4, 0.6];
        let b = vec![0.8, 0.2, 0.5, 0.3];
        let w = [1.0, 1.5, 0.5, 1.8];
        assert_eq!(cosine(&a, &b, None), cosine(&b, &a, None));
        assert_eq!(cosine(&a, &b, Some(&w)), cosine(&b, &a, Some(&w)));
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        assert!(cosine(&[1.0, 0.0], &[0.0, 1.0], None).abs() < EPS);
        assert!((cosine(&[1.0, 2.0], &[-1.0, -2.0], None) + 1.0).abs() < EPS);
    }

    #[test]
    fn test_weights_repeat_cyclically() {
        let a = vec![1.0, 0.0, 1.0, 0.0];
        let b = vec![1.0, 1.0, 1.0, 1.0];
        // Poids nul sur la 2e feature de chaque tirage : b se réduit à a
        assert!((cosine(&a, &b, Some(&[1.0, 0.0])) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_time_decay() {
        assert_eq!(time_decay(0, 300, 0.1), 1.0);
        assert!((time_decay(150, 300, 0.1) - 0.95).abs() < EPS);
        assert_eq!(time_decay(10, 0, 0.1), 1.0);
    }

    #[test]
    fn test_scorer_applies_decay() {
        let scorer = SimilarityScorer::new(vec![1.0], 0.1);
        let v = vec![0.5, 0.5];
        assert!((scorer.score(&v, &v, 100, 200) - 0.95).abs() < EPS);
        assert!((SimilarityScorer::new(Vec::new(), 0.0).score(&v, &v, 100, 200) - 1.0).abs() < EPS);
    }
}
