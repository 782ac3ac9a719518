use api_scaffold_core::{ProjectLayout, ResourceName, ScaffoldError};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z_]+)\s*\}\}").expect("placeholder pattern is valid"))
}

pub fn render_template(template: &str, context: &HashMap<&str, String>) -> Result<String, ScaffoldError> {
    let mut result = template.to_string();

    for (key, value) in context {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    if let Some(missing) = placeholder_pattern().captures(&result) {
        return Err(ScaffoldError::Template(format!(
            "no value for placeholder '{}'",
            &missing[1]
        )));
    }

    Ok(result)
}

/// PSR-4 namespace for a project-relative directory: `app/Http/Requests` → `App\Http\Requests`.
pub fn namespace_for(dir: &Path) -> String {
    dir.components()
        .filter_map(|c| c.as_os_str().to_str())
        .map(api_scaffold_core::inflector::to_studly_case)
        .collect::<Vec<_>>()
        .join("\\")
}

/// Placeholder values shared by every template for one resource.
pub fn context_for<'a>(name: &ResourceName, layout: &ProjectLayout) -> HashMap<&'a str, String> {
    let mut context = HashMap::new();
    context.insert("name", name.studly().to_string());
    context.insert("table", name.table());
    context.insert("model_namespace", namespace_for(&layout.models_dir));
    context.insert("request_namespace", namespace_for(&layout.requests_dir));
    context.insert("controller_namespace", namespace_for(&layout.controllers_dir));
    context
}

pub fn render_model(name: &ResourceName, layout: &ProjectLayout) -> Result<String, ScaffoldError> {
    render_template(MODEL_TEMPLATE, &context_for(name, layout))
}

pub fn render_request(class_name: &str, layout: &ProjectLayout) -> Result<String, ScaffoldError> {
    let mut context = HashMap::new();
    context.insert("class", class_name.to_string());
    context.insert("request_namespace", namespace_for(&layout.requests_dir));
    render_template(REQUEST_TEMPLATE, &context)
}

pub fn render_controller(name: &ResourceName, layout: &ProjectLayout) -> Result<String, ScaffoldError> {
    render_template(CONTROLLER_TEMPLATE, &context_for(name, layout))
}

pub static MODEL_TEMPLATE: &str = r#"<?php

namespace {{model_namespace}};

use Illuminate\Database\Eloquent\Factories\HasFactory;
use Illuminate\Database\Eloquent\Model;
use Illuminate\Database\Eloquent\SoftDeletes;

class {{name}} extends Model
{
    use HasFactory, SoftDeletes;

    protected $fillable = [
        'name'
    ];
}
"#;

pub static REQUEST_TEMPLATE: &str = r#"<?php

namespace {{request_namespace}};

use Illuminate\Contracts\Validation\Validator;
use Illuminate\Foundation\Http\FormRequest;
use Illuminate\Http\Exceptions\HttpResponseException;

class {{class}} extends FormRequest
{
    /**
     * Determine if the user is authorized to make this request.
     *
     * @return bool
     */
    public function authorize()
    {
        return true;
    }

    /**
     * Get the validation rules that apply to the request.
     *
     * @return array<string, mixed>
     */
    public function rules()
    {
        return [
            'name' => 'required'
        ];
    }

    public function failedValidation(Validator $validator)
    {
        $response = response()->json([
            'message' => $validator->errors()->first(),
            'details' => $validator->errors()
        ], 422);

        throw new HttpResponseException($response);
    }
}
"#;

pub static CONTROLLER_TEMPLATE: &str = r#"<?php

namespace {{controller_namespace}};

use App\Http\Controllers\Controller;
use {{request_namespace}}\{{name}}StoreRequest;
use {{request_namespace}}\{{name}}UpdateRequest;
use {{model_namespace}}\{{name}};
use Illuminate\Http\Request;
use Exception;

class {{name}}Controller extends Controller
{
    public function index(Request $request)
    {
        try {
            $search = $request->query('q');

            return {{name}}::when(!empty($search), function ($q) use ($search) {
                $q->where('name', 'LIKE', '%' . $search . '%');
            })
            ->when($request->query('sortField') && $request->query('sortOrder'), function ($q) use ($request) {
                return $q->orderBy($request->query('sortField'), $request->query('sortOrder'));
            })
            ->paginate($request->query('sizePerPage', 25));
        } catch (Exception $error) {
            return response()->json([
                'message' => $error->getMessage()
            ], 400);
        }
    }

    public function store({{name}}StoreRequest $request)
    {
        return {{name}}::create($request->validated());
    }

    public function show($id)
    {
        $model = {{name}}::findOrFail($id);
        return response()->json($model);
    }

    public function update({{name}}UpdateRequest $request, $id)
    {
        $model = {{name}}::findOrFail($id);
        $model->update($request->validated());
        return response()->json($model);
    }

    public function destroy($id)
    {
        $model = {{name}}::findOrFail($id);
        $model->delete();
        return response()->json(['message' => 'Deleted successfully']);
    }
}
"#;

// Default boilerplate written by `StubGenerator`, mirroring what the host
// framework's own generators emit before any rewrite.

pub static MODEL_STUB: &str = r#"<?php

namespace {{model_namespace}};

use Illuminate\Database\Eloquent\Factories\HasFactory;
use Illuminate\Database\Eloquent\Model;

class {{name}} extends Model
{
    use HasFactory;
}
"#;

pub static MIGRATION_STUB: &str = r#"<?php

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

return new class extends Migration
{
    /**
     * Run the migrations.
     */
    public function up(): void
    {
        Schema::create('{{table}}', function (Blueprint $table) {
            $table->id();
            $table->timestamps();
        });
    }

    /**
     * Reverse the migrations.
     */
    public function down(): void
    {
        Schema::dropIfExists('{{table}}');
    }
};
"#;

pub static REQUEST_STUB: &str = r#"<?php

namespace {{request_namespace}};

use Illuminate\Foundation\Http\FormRequest;

class {{class}} extends FormRequest
{
    /**
     * Determine if the user is authorized to make this request.
     */
    public function authorize(): bool
    {
        return false;
    }

    /**
     * Get the validation rules that apply to the request.
     *
     * @return array<string, \Illuminate\Contracts\Validation\ValidationRule|array<mixed>|string>
     */
    public function rules(): array
    {
        return [
            //
        ];
    }
}
"#;

pub static CONTROLLER_STUB: &str = r#"<?php

namespace {{controller_namespace}};

use App\Http\Controllers\Controller;
use Illuminate\Http\Request;

class {{name}}Controller extends Controller
{
    /**
     * Display a listing of the resource.
     */
    public function index()
    {
        //
    }

    /**
     * Store a newly created resource in storage.
     */
    public function store(Request $request)
    {
        //
    }

    /**
     * Display the specified resource.
     */
    public function show(string $id)
    {
        //
    }

    /**
     * Update the specified resource in storage.
     */
    public function update(Request $request, string $id)
    {
        //
    }

    /**
     * Remove the specified resource from storage.
     */
    public function destroy(string $id)
    {
        //
    }
}
"#;
