// Partition - バッチ分割とシャッフル

use rand::Rng;

/// 連続したチャンクに分割する
///
/// チャンク数は `ceil(len / size)`、最後のチャンクのみ短くなりうる。
/// `size == 0` の場合は空を返す。
pub fn chunk<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if size == 0 {
        return Vec::new();
    }
    items.chunks(size).map(<[T]>::to_vec).collect()
}

/// 一様ランダムに並べ替えたコピーを返す（元の配列は変更しない）
pub fn shuffled<T: Clone>(items: &[T]) -> Vec<T> {
    shuffled_with(items, &mut rand::thread_rng())
}

/// Fisher-Yates (Durstenfeld) シャッフル
pub fn shuffled_with<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut work = items.to_vec();
    for i in (1..work.len()).rev() {
        let j = rng.gen_range(0..=i);
        work.swap(i, j);
    }
    work
}
